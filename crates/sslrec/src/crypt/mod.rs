//! Cipher-suite parameters and per-direction cipher state.
//!
//! Bridges the record codec with the `sslrec-crypto` primitives.

pub mod cipher_state;

pub use cipher_state::{BulkCipher, CipherState};

use crate::{CipherSuite, RecordError};
use sslrec_types::{CipherAlgId, MacAlgId};

/// AEAD authentication tag length.
pub const AEAD_TAG_LEN: usize = 16;

/// AEAD explicit per-record nonce length (the sequence number).
pub const AEAD_EXPLICIT_NONCE_LEN: usize = 8;

/// How a bulk cipher shapes the record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherShape {
    /// Keystream or null cipher: payload = content || MAC.
    Stream,
    /// CBC: payload = content || MAC || padding || padding_length.
    Block { block_size: usize },
    /// Authenticated encryption: payload = nonce || ciphertext || tag.
    Aead { tag_len: usize },
}

/// Parameters associated with a cipher suite.
#[derive(Debug, Clone)]
pub struct CipherSuiteParams {
    /// The cipher suite identifier.
    pub suite: CipherSuite,
    /// Bulk cipher.
    pub cipher: CipherAlgId,
    /// Record MAC.
    pub mac: MacAlgId,
    /// Encryption key length in bytes.
    pub key_len: usize,
    /// IV length from the key block (fixed IV for AEAD).
    pub iv_len: usize,
    /// MAC secret and MAC output length (0 for AEAD and null MAC).
    pub mac_len: usize,
}

impl CipherSuiteParams {
    pub fn from_suite(suite: CipherSuite) -> Result<Self, RecordError> {
        let (cipher, mac) = match suite {
            CipherSuite::NULL_WITH_NULL_NULL => (CipherAlgId::Null, MacAlgId::Null),
            CipherSuite::RSA_WITH_NULL_MD5 => (CipherAlgId::Null, MacAlgId::Md5),
            CipherSuite::RSA_WITH_NULL_SHA => (CipherAlgId::Null, MacAlgId::Sha1),
            CipherSuite::RSA_WITH_RC4_128_MD5 => (CipherAlgId::Rc4_128, MacAlgId::Md5),
            CipherSuite::RSA_WITH_RC4_128_SHA => (CipherAlgId::Rc4_128, MacAlgId::Sha1),
            CipherSuite::RSA_WITH_DES_CBC_SHA => (CipherAlgId::DesCbc, MacAlgId::Sha1),
            CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA => (CipherAlgId::TdesEdeCbc, MacAlgId::Sha1),
            CipherSuite::RSA_WITH_AES_128_CBC_SHA => (CipherAlgId::Aes128Cbc, MacAlgId::Sha1),
            CipherSuite::RSA_WITH_AES_256_CBC_SHA => (CipherAlgId::Aes256Cbc, MacAlgId::Sha1),
            // GCM authenticates inside the cipher; no record MAC.
            CipherSuite::RSA_WITH_AES_128_GCM_SHA256 => (CipherAlgId::Aes128Gcm, MacAlgId::Null),
            _ => {
                return Err(RecordError::Internal(format!(
                    "unknown cipher suite {:#06x}",
                    suite.0
                )))
            }
        };
        Ok(Self {
            suite,
            cipher,
            mac,
            key_len: cipher.key_len(),
            iv_len: cipher.iv_len(),
            mac_len: mac.digest_size(),
        })
    }

    pub fn shape(&self) -> CipherShape {
        match self.cipher {
            CipherAlgId::Null | CipherAlgId::Rc4_128 => CipherShape::Stream,
            CipherAlgId::DesCbc
            | CipherAlgId::TdesEdeCbc
            | CipherAlgId::Aes128Cbc
            | CipherAlgId::Aes256Cbc => CipherShape::Block {
                block_size: self.cipher.block_size(),
            },
            CipherAlgId::Aes128Gcm => CipherShape::Aead {
                tag_len: AEAD_TAG_LEN,
            },
        }
    }
}
