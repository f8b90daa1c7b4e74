#![forbid(unsafe_code)]
#![doc = "Symmetric primitives used by the sslrec record layer."]

// Core traits
pub mod provider;

// Hash algorithms
pub mod hash;

// Symmetric ciphers
pub mod block;
#[cfg(feature = "rc4")]
pub mod arc4;

// Modes of operation
pub mod cbc;

// MAC algorithms
#[cfg(feature = "hmac")]
pub mod mac;

pub use provider::{BlockCipher, Digest, StreamCipher};
