//! Hash algorithms behind the [`Digest`] trait.
//!
//! The implementations come from the RustCrypto hash crates; this module only
//! adapts them to the provider interface and maps identifiers to instances.

pub use crate::provider::Digest;

use sslrec_types::{CryptoError, HashAlgId};

/// Adapter from a RustCrypto hasher to the provider [`Digest`] trait.
#[derive(Clone, Default)]
pub struct HashAdapter<D> {
    inner: D,
}

impl<D> Digest for HashAdapter<D>
where
    D: digest::Digest + digest::core_api::BlockSizeUser + Default + Send + Sync,
{
    fn output_size(&self) -> usize {
        <D as digest::Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        <D as digest::core_api::BlockSizeUser>::block_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        digest::Digest::update(&mut self.inner, data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let size = self.output_size();
        if out.len() < size {
            return Err(CryptoError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        let digest = std::mem::take(&mut self.inner).finalize();
        out[..size].copy_from_slice(&digest);
        Ok(())
    }
}

#[cfg(feature = "md5")]
pub type Md5 = HashAdapter<md5::Md5>;

#[cfg(feature = "sha1")]
pub type Sha1 = HashAdapter<sha1::Sha1>;

#[cfg(feature = "sha2")]
pub type Sha256 = HashAdapter<sha2::Sha256>;

/// Create a fresh digest context for `alg`.
pub fn new_digest(alg: HashAlgId) -> Result<Box<dyn Digest>, CryptoError> {
    match alg {
        #[cfg(feature = "md5")]
        HashAlgId::Md5 => Ok(Box::<Md5>::default()),
        #[cfg(feature = "sha1")]
        HashAlgId::Sha1 => Ok(Box::<Sha1>::default()),
        #[cfg(feature = "sha2")]
        HashAlgId::Sha256 => Ok(Box::<Sha256>::default()),
        #[allow(unreachable_patterns)]
        _ => Err(CryptoError::NotSupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_hex(alg: HashAlgId, data: &[u8]) -> String {
        let mut ctx = new_digest(alg).unwrap();
        ctx.update(data).unwrap();
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out).unwrap();
        hex::encode(out)
    }

    #[test]
    fn test_md5_abc() {
        assert_eq!(
            digest_hex(HashAlgId::Md5, b"abc"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_sha1_abc() {
        assert_eq!(
            digest_hex(HashAlgId::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            digest_hex(HashAlgId::Sha256, b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_finish_resets_state() {
        let mut ctx = new_digest(HashAlgId::Sha1).unwrap();
        let mut first = [0u8; 20];
        let mut second = [0u8; 20];
        ctx.update(b"abc").unwrap();
        ctx.finish(&mut first).unwrap();
        ctx.update(b"abc").unwrap();
        ctx.finish(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_block_sizes() {
        assert_eq!(new_digest(HashAlgId::Md5).unwrap().block_size(), 64);
        assert_eq!(new_digest(HashAlgId::Sha1).unwrap().block_size(), 64);
    }

    #[test]
    fn test_finish_short_buffer() {
        let mut ctx = new_digest(HashAlgId::Md5).unwrap();
        let mut out = [0u8; 8];
        assert!(matches!(
            ctx.finish(&mut out),
            Err(CryptoError::BufferTooSmall { need: 16, got: 8 })
        ));
    }
}
