//! SSL 3.0 record MAC.
//!
//! ```text
//! inner = H(secret || pad1 || seq || type || length || content)
//! mac   = H(secret || pad2 || inner)
//! ```
//!
//! pad1 is 0x36 and pad2 is 0x5c, repeated 48 times for MD5 and 40 times
//! for SHA-1.

use sslrec_crypto::hash::new_digest;
use sslrec_types::{CryptoError, HashAlgId};
use zeroize::Zeroize;

const PAD1_BYTE: u8 = 0x36;
const PAD2_BYTE: u8 = 0x5c;

/// Longest pad (MD5).
const MAX_PAD_LEN: usize = 48;

fn pad_len(hash: HashAlgId) -> Result<usize, CryptoError> {
    match hash {
        HashAlgId::Md5 => Ok(48),
        HashAlgId::Sha1 => Ok(40),
        HashAlgId::Sha256 => Err(CryptoError::NotSupported),
    }
}

/// SSL 3.0 MAC engine: the MAC secret plus the hash it is used with.
pub struct Ssl3Mac {
    hash: HashAlgId,
    secret: Vec<u8>,
}

impl Drop for Ssl3Mac {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl Ssl3Mac {
    pub fn new(hash: HashAlgId, secret: &[u8]) -> Result<Self, CryptoError> {
        pad_len(hash)?;
        Ok(Self {
            hash,
            secret: secret.to_vec(),
        })
    }

    pub fn output_size(&self) -> usize {
        self.hash.output_size()
    }

    /// Compute the MAC over `header || content` into `out`.
    pub fn compute(&self, header: &[u8], content: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
        let size = self.output_size();
        if out.len() < size {
            return Err(CryptoError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        let pad_len = pad_len(self.hash)?;
        let pad1 = [PAD1_BYTE; MAX_PAD_LEN];
        let pad2 = [PAD2_BYTE; MAX_PAD_LEN];

        let mut ctx = new_digest(self.hash)?;
        ctx.update(&self.secret)?;
        ctx.update(&pad1[..pad_len])?;
        ctx.update(header)?;
        ctx.update(content)?;
        let mut inner = [0u8; 32];
        ctx.finish(&mut inner[..size])?;

        ctx.update(&self.secret)?;
        ctx.update(&pad2[..pad_len])?;
        ctx.update(&inner[..size])?;
        ctx.finish(&mut out[..size])?;
        inner.zeroize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(alg: HashAlgId, parts: &[&[u8]]) -> Vec<u8> {
        let mut ctx = new_digest(alg).unwrap();
        for p in parts {
            ctx.update(p).unwrap();
        }
        let mut out = vec![0u8; alg.output_size()];
        ctx.finish(&mut out).unwrap();
        out
    }

    #[test]
    fn test_ssl3_md5_matches_construction() {
        let secret = [0x5au8; 16];
        let header = [0u8, 0, 0, 0, 0, 0, 0, 3, 23, 0, 4];
        let content = b"ping";

        let mac = Ssl3Mac::new(HashAlgId::Md5, &secret).unwrap();
        let mut out = [0u8; 16];
        mac.compute(&header, content, &mut out).unwrap();

        let inner = hash(
            HashAlgId::Md5,
            &[&secret, &[0x36; 48], &header, content],
        );
        let expected = hash(HashAlgId::Md5, &[&secret, &[0x5c; 48], &inner]);
        assert_eq!(out.to_vec(), expected);
    }

    #[test]
    fn test_ssl3_sha1_uses_40_byte_pads() {
        let secret = [0x01u8; 20];
        let header = [0u8; 11];
        let mac = Ssl3Mac::new(HashAlgId::Sha1, &secret).unwrap();
        let mut out = [0u8; 20];
        mac.compute(&header, b"", &mut out).unwrap();

        let inner = hash(HashAlgId::Sha1, &[&secret, &[0x36; 40], &header]);
        let expected = hash(HashAlgId::Sha1, &[&secret, &[0x5c; 40], &inner]);
        assert_eq!(out.to_vec(), expected);

        let wrong_inner = hash(HashAlgId::Sha1, &[&secret, &[0x36; 48], &header]);
        let wrong = hash(HashAlgId::Sha1, &[&secret, &[0x5c; 48], &wrong_inner]);
        assert_ne!(out.to_vec(), wrong);
    }

    #[test]
    fn test_ssl3_rejects_sha256() {
        assert!(matches!(
            Ssl3Mac::new(HashAlgId::Sha256, &[0u8; 32]),
            Err(CryptoError::NotSupported)
        ));
    }

    #[test]
    fn test_ssl3_short_output() {
        let mac = Ssl3Mac::new(HashAlgId::Sha1, &[0u8; 20]).unwrap();
        let mut out = [0u8; 16];
        assert!(mac.compute(&[], b"", &mut out).is_err());
    }
}
