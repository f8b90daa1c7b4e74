//! TLS record MAC: HMAC over `seq || type || version || length || content`.
//!
//! The keyed HMAC context is built once when the cipher state is activated
//! and reused for every record.

use sslrec_crypto::mac::HmacKey;
use sslrec_types::{CryptoError, HashAlgId};

/// TLS MAC engine holding the persistent keyed HMAC context.
pub struct Tls1Mac {
    key: HmacKey,
}

impl Tls1Mac {
    pub fn new(hash: HashAlgId, secret: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: HmacKey::new(hash, secret)?,
        })
    }

    pub fn output_size(&self) -> usize {
        self.key.output_size()
    }

    pub fn compute(&self, header: &[u8], content: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
        self.key.compute(&[header, content], out)
    }
}
