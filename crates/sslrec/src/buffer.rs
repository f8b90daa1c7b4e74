//! Owned byte buffers for record assembly.
//!
//! Buffers are zero-filled when allocated or grown and wiped when shrunk,
//! freed or dropped, so plaintext and key-derived bytes never outlive the
//! buffer that held them.

use std::ops::{Deref, DerefMut};

use zeroize::Zeroize;

/// A zero-initialised, self-wiping byte buffer.
#[derive(Default)]
pub struct SslBuffer {
    data: Vec<u8>,
}

impl SslBuffer {
    /// An empty buffer with no allocation.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Allocate `len` zero bytes.
    pub fn alloc(len: usize) -> Self {
        Self { data: vec![0u8; len] }
    }

    /// Allocate a buffer holding a copy of `src`.
    pub fn from_slice(src: &[u8]) -> Self {
        Self { data: src.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Change the length to `new_len`.
    ///
    /// New bytes are zero. Bytes cut off by shrinking are wiped first. When
    /// growth needs a new allocation the contents are moved and the old
    /// allocation is wiped.
    pub fn resize(&mut self, new_len: usize) {
        let len = self.data.len();
        if new_len <= len {
            self.data[new_len..].zeroize();
            self.data.truncate(new_len);
        } else if new_len <= self.data.capacity() {
            self.data.resize(new_len, 0);
        } else {
            let mut grown = vec![0u8; new_len];
            grown[..len].copy_from_slice(&self.data);
            self.data.zeroize();
            self.data = grown;
        }
    }

    /// Wipe the contents and release the allocation.
    pub fn free(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
    }
}

impl Drop for SslBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl Deref for SslBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for SslBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for SslBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for SslBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SslBuffer")
            .field("len", &self.data.len())
            .finish()
    }
}
