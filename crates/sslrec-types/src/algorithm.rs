/// Hash algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgId {
    /// Digest output size in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            HashAlgId::Md5 => 16,
            HashAlgId::Sha1 => 20,
            HashAlgId::Sha256 => 32,
        }
    }

    /// Internal compression block size in bytes.
    pub const fn block_size(self) -> usize {
        64
    }
}

/// Record MAC algorithm identifiers.
///
/// `Null` is the MAC of the initial (unprotected) cipher state and of the
/// `*_NULL_*` suites with no authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgId {
    Null,
    Md5,
    Sha1,
    Sha256,
}

impl MacAlgId {
    /// The hash underlying this MAC, if any.
    pub const fn hash(self) -> Option<HashAlgId> {
        match self {
            MacAlgId::Null => None,
            MacAlgId::Md5 => Some(HashAlgId::Md5),
            MacAlgId::Sha1 => Some(HashAlgId::Sha1),
            MacAlgId::Sha256 => Some(HashAlgId::Sha256),
        }
    }

    /// Size of the MAC appended to each record.
    pub const fn digest_size(self) -> usize {
        match self.hash() {
            Some(h) => h.output_size(),
            None => 0,
        }
    }
}

/// Bulk cipher algorithm identifiers (algorithm + mode combination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgId {
    Null,
    Rc4_128,
    DesCbc,
    TdesEdeCbc,
    Aes128Cbc,
    Aes256Cbc,
    Aes128Gcm,
}

impl CipherAlgId {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            CipherAlgId::Null => 0,
            CipherAlgId::Rc4_128 => 16,
            CipherAlgId::DesCbc => 8,
            CipherAlgId::TdesEdeCbc => 24,
            CipherAlgId::Aes128Cbc | CipherAlgId::Aes128Gcm => 16,
            CipherAlgId::Aes256Cbc => 32,
        }
    }

    /// Length of the IV taken from the key block (fixed IV for AEAD).
    pub const fn iv_len(self) -> usize {
        match self {
            CipherAlgId::Null | CipherAlgId::Rc4_128 => 0,
            CipherAlgId::DesCbc | CipherAlgId::TdesEdeCbc => 8,
            CipherAlgId::Aes128Cbc | CipherAlgId::Aes256Cbc => 16,
            CipherAlgId::Aes128Gcm => 4,
        }
    }

    /// Block size for block ciphers, 0 otherwise.
    pub const fn block_size(self) -> usize {
        match self {
            CipherAlgId::DesCbc | CipherAlgId::TdesEdeCbc => 8,
            CipherAlgId::Aes128Cbc | CipherAlgId::Aes256Cbc => 16,
            _ => 0,
        }
    }
}
