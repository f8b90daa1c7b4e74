//! RC4 keystream cipher behind the [`StreamCipher`] trait.

use cipher::consts::U16;
use cipher::{KeyInit, StreamCipher as _};
use sslrec_types::CryptoError;

use crate::provider::StreamCipher;

/// 128-bit RC4 as used by the `*_RC4_128_*` suites.
pub struct Rc4_128 {
    inner: rc4::Rc4<U16>,
}

impl Rc4_128 {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let inner = rc4::Rc4::<U16>::new_from_slice(key).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: 16,
                got: key.len(),
            }
        })?;
        Ok(Self { inner })
    }
}

impl StreamCipher for Rc4_128 {
    fn apply_keystream(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        self.inner.apply_keystream(data);
        Ok(())
    }
}
