//! Trait-based provider interface for the primitives the record layer uses.
//!
//! Algorithm implementations are selected by identifier at cipher-state
//! activation and held behind these traits for the lifetime of the state.

use sslrec_types::CryptoError;

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// The internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash, write the digest to `out` and reset the state.
    /// The length of `out` must be at least `output_size()`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;
}

/// A block cipher keyed for both directions.
pub trait BlockCipher: Send + Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypt a single block in-place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;

    /// Decrypt a single block in-place.
    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;
}

/// A keystream cipher. Encryption and decryption are the same operation and
/// advance the keystream.
pub trait StreamCipher: Send + Sync {
    /// XOR the next `data.len()` keystream bytes into `data`.
    fn apply_keystream(&mut self, data: &mut [u8]) -> Result<(), CryptoError>;
}
