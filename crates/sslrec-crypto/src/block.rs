//! Block ciphers behind the [`BlockCipher`] trait.

use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit};
use sslrec_types::{CipherAlgId, CryptoError};

use crate::provider::BlockCipher;

/// Adapter from a RustCrypto block cipher to the provider [`BlockCipher`] trait.
pub struct BlockAdapter<C> {
    cipher: C,
}

impl<C> BlockAdapter<C>
where
    C: KeyInit,
{
    /// Key the cipher. Fails if `key` has the wrong length for `C`.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: C::key_size(),
            got: key.len(),
        })?;
        Ok(Self { cipher })
    }
}

impl<C> BlockAdapter<C>
where
    C: BlockSizeUser,
{
    fn check_block(block: &[u8]) -> Result<(), CryptoError> {
        if block.len() != C::block_size() {
            return Err(CryptoError::NotBlockAligned {
                len: block.len(),
                block_size: C::block_size(),
            });
        }
        Ok(())
    }
}

impl<C> BlockCipher for BlockAdapter<C>
where
    C: BlockEncrypt + BlockDecrypt + Send + Sync,
{
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        Self::check_block(block)?;
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        Self::check_block(block)?;
        self.cipher
            .decrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }
}

#[cfg(feature = "aes")]
pub type Aes128 = BlockAdapter<aes::Aes128>;
#[cfg(feature = "aes")]
pub type Aes256 = BlockAdapter<aes::Aes256>;
#[cfg(feature = "des")]
pub type Des = BlockAdapter<des::Des>;
#[cfg(feature = "des")]
pub type TdesEde3 = BlockAdapter<des::TdesEde3>;

/// Key the block cipher underlying a CBC cipher id.
pub fn new_block_cipher(alg: CipherAlgId, key: &[u8]) -> Result<Box<dyn BlockCipher>, CryptoError> {
    match alg {
        #[cfg(feature = "aes")]
        CipherAlgId::Aes128Cbc => Ok(Box::new(Aes128::new(key)?)),
        #[cfg(feature = "aes")]
        CipherAlgId::Aes256Cbc => Ok(Box::new(Aes256::new(key)?)),
        #[cfg(feature = "des")]
        CipherAlgId::DesCbc => Ok(Box::new(Des::new(key)?)),
        #[cfg(feature = "des")]
        CipherAlgId::TdesEdeCbc => Ok(Box::new(TdesEde3::new(key)?)),
        CipherAlgId::Null | CipherAlgId::Rc4_128 | CipherAlgId::Aes128Gcm => {
            Err(CryptoError::InvalidAlgId)
        }
        #[allow(unreachable_patterns)]
        _ => Err(CryptoError::NotSupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 Appendix C.1
    #[test]
    fn test_aes128_block_vector() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let cipher = new_block_cipher(CipherAlgId::Aes128Cbc, &key).unwrap();
        let mut block = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        cipher.encrypt_block(&mut block).unwrap();
        assert_eq!(hex::encode(&block), "69c4e0d86a7b0430d8cdb78070b4c55a");
        cipher.decrypt_block(&mut block).unwrap();
        assert_eq!(hex::encode(&block), "00112233445566778899aabbccddeeff");
    }

    #[test]
    fn test_wrong_key_length() {
        let err = new_block_cipher(CipherAlgId::Aes256Cbc, &[0u8; 16]).err().unwrap();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                got: 16
            }
        ));
    }

    #[test]
    fn test_partial_block_rejected() {
        let cipher = new_block_cipher(CipherAlgId::TdesEdeCbc, &[0x11u8; 24]).unwrap();
        assert_eq!(cipher.block_size(), 8);
        let mut short = [0u8; 7];
        assert!(cipher.encrypt_block(&mut short).is_err());
    }

    #[test]
    fn test_stream_ids_rejected() {
        assert!(new_block_cipher(CipherAlgId::Rc4_128, &[0u8; 16]).is_err());
        assert!(new_block_cipher(CipherAlgId::Null, &[]).is_err());
    }
}
