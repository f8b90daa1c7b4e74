//! CBC (Cipher Block Chaining) with a chained IV.
//!
//! The chaining value persists across calls: after each encrypt or decrypt
//! the last ciphertext block becomes the IV for the next call. SSL 3.0 and
//! TLS 1.0 rely on this for records without an explicit IV.

use sslrec_types::CryptoError;
use zeroize::Zeroize;

use crate::provider::BlockCipher;

/// A keyed block cipher plus its running chaining value.
pub struct Cbc {
    cipher: Box<dyn BlockCipher>,
    iv: Vec<u8>,
}

impl Drop for Cbc {
    fn drop(&mut self) {
        self.iv.zeroize();
    }
}

impl Cbc {
    pub fn new(cipher: Box<dyn BlockCipher>, iv: &[u8]) -> Result<Self, CryptoError> {
        let block_size = cipher.block_size();
        if iv.len() != block_size {
            return Err(CryptoError::InvalidIvLength {
                expected: block_size,
                got: iv.len(),
            });
        }
        Ok(Self {
            cipher,
            iv: iv.to_vec(),
        })
    }

    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn check_aligned(&self, data: &[u8]) -> Result<(), CryptoError> {
        let block_size = self.block_size();
        if data.len() % block_size != 0 {
            return Err(CryptoError::NotBlockAligned {
                len: data.len(),
                block_size,
            });
        }
        Ok(())
    }

    /// Encrypt block-aligned `data` in place.
    pub fn encrypt(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        self.check_aligned(data)?;
        let block_size = self.block_size();
        for chunk in data.chunks_mut(block_size) {
            for (b, p) in chunk.iter_mut().zip(self.iv.iter()) {
                *b ^= *p;
            }
            self.cipher.encrypt_block(chunk)?;
            self.iv.copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Decrypt block-aligned `data` in place. No padding is removed.
    pub fn decrypt(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        self.check_aligned(data)?;
        let block_size = self.block_size();
        let mut saved = vec![0u8; block_size];
        for chunk in data.chunks_mut(block_size) {
            saved.copy_from_slice(chunk);
            self.cipher.decrypt_block(chunk)?;
            for (b, p) in chunk.iter_mut().zip(self.iv.iter()) {
                *b ^= *p;
            }
            self.iv.copy_from_slice(&saved);
        }
        saved.zeroize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::new_block_cipher;
    use sslrec_types::CipherAlgId;

    fn aes128_cbc(key: &[u8], iv: &[u8]) -> Cbc {
        Cbc::new(new_block_cipher(CipherAlgId::Aes128Cbc, key).unwrap(), iv).unwrap()
    }

    // NIST SP 800-38A F.2.1 CBC-AES128.Encrypt, first two blocks
    #[test]
    fn test_cbc_aes128_sp800_38a() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let mut data = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
        )
        .unwrap();
        aes128_cbc(&key, &iv).encrypt(&mut data).unwrap();
        assert_eq!(
            hex::encode(&data),
            "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"
        );
    }

    #[test]
    fn test_cbc_chaining_across_calls() {
        let key = [0x42u8; 16];
        let iv = [0x24u8; 16];
        let plaintext = [0x11u8; 64];

        let mut whole = plaintext;
        aes128_cbc(&key, &iv).encrypt(&mut whole).unwrap();

        let mut split = plaintext;
        let mut enc = aes128_cbc(&key, &iv);
        enc.encrypt(&mut split[..32]).unwrap();
        enc.encrypt(&mut split[32..]).unwrap();
        assert_eq!(whole, split);

        let mut dec = aes128_cbc(&key, &iv);
        dec.decrypt(&mut split[..16]).unwrap();
        dec.decrypt(&mut split[16..]).unwrap();
        assert_eq!(split, plaintext);
    }

    #[test]
    fn test_cbc_rejects_unaligned() {
        let mut enc = aes128_cbc(&[0u8; 16], &[0u8; 16]);
        let mut data = [0u8; 17];
        assert!(matches!(
            enc.encrypt(&mut data),
            Err(CryptoError::NotBlockAligned {
                len: 17,
                block_size: 16
            })
        ));
    }

    #[test]
    fn test_cbc_rejects_bad_iv() {
        let cipher = new_block_cipher(CipherAlgId::Aes128Cbc, &[0u8; 16]).unwrap();
        assert!(Cbc::new(cipher, &[0u8; 8]).is_err());
    }
}
