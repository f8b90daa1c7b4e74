//! Keyed HMAC contexts.
//!
//! An [`HmacKey`] is keyed once and cloned for every message, so the key
//! schedule is computed a single time per cipher-state activation.

use hmac::{Hmac, Mac};
use sslrec_types::{CryptoError, HashAlgId};

/// A keyed HMAC ready to authenticate any number of messages.
#[derive(Clone)]
pub enum HmacKey {
    Md5(Hmac<md5::Md5>),
    Sha1(Hmac<sha1::Sha1>),
    Sha256(Hmac<sha2::Sha256>),
}

impl HmacKey {
    pub fn new(alg: HashAlgId, key: &[u8]) -> Result<Self, CryptoError> {
        // HMAC accepts keys of any length.
        let invalid = |_| CryptoError::InvalidKeyLength {
            expected: alg.output_size(),
            got: key.len(),
        };
        Ok(match alg {
            HashAlgId::Md5 => HmacKey::Md5(Hmac::new_from_slice(key).map_err(invalid)?),
            HashAlgId::Sha1 => HmacKey::Sha1(Hmac::new_from_slice(key).map_err(invalid)?),
            HashAlgId::Sha256 => HmacKey::Sha256(Hmac::new_from_slice(key).map_err(invalid)?),
        })
    }

    pub fn output_size(&self) -> usize {
        match self {
            HmacKey::Md5(_) => HashAlgId::Md5.output_size(),
            HmacKey::Sha1(_) => HashAlgId::Sha1.output_size(),
            HmacKey::Sha256(_) => HashAlgId::Sha256.output_size(),
        }
    }

    /// HMAC over the concatenation of `parts`, written to `out`.
    pub fn compute(&self, parts: &[&[u8]], out: &mut [u8]) -> Result<(), CryptoError> {
        let size = self.output_size();
        if out.len() < size {
            return Err(CryptoError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        match self {
            HmacKey::Md5(key) => finish(key.clone(), parts, &mut out[..size]),
            HmacKey::Sha1(key) => finish(key.clone(), parts, &mut out[..size]),
            HmacKey::Sha256(key) => finish(key.clone(), parts, &mut out[..size]),
        }
        Ok(())
    }
}

fn finish<M: Mac>(mut mac: M, parts: &[&[u8]], out: &mut [u8]) {
    for part in parts {
        mac.update(part);
    }
    out.copy_from_slice(&mac.finalize().into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_hex(alg: HashAlgId, key: &[u8], parts: &[&[u8]]) -> String {
        let key = HmacKey::new(alg, key).unwrap();
        let mut out = vec![0u8; key.output_size()];
        key.compute(parts, &mut out).unwrap();
        hex::encode(out)
    }

    // RFC 2202 test case 2
    #[test]
    fn test_hmac_md5_rfc2202() {
        assert_eq!(
            hmac_hex(HashAlgId::Md5, b"Jefe", &[b"what do ya want ", b"for nothing?"]),
            "750c783e6ab0b503eaa86e310a5db738"
        );
    }

    // RFC 2202 test case 2
    #[test]
    fn test_hmac_sha1_rfc2202() {
        assert_eq!(
            hmac_hex(HashAlgId::Sha1, b"Jefe", &[b"what do ya want for nothing?"]),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_hmac_key_reused_across_messages() {
        let key = HmacKey::new(HashAlgId::Sha256, &[0x0bu8; 20]).unwrap();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        key.compute(&[b"Hi There"], &mut a).unwrap();
        key.compute(&[b"Hi ", b"There"], &mut b).unwrap();
        assert_eq!(a, b);
        // RFC 4231 test case 1
        assert_eq!(
            hex::encode(a),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }
}
