//! Record layer: framing, the per-version codec, and the outbound queue.

pub mod codec;
pub mod dtls;
pub mod layer;
pub mod ops;
pub mod queue;
pub mod seq;

pub use layer::RecordLayer;
pub use ops::{record_ops, RecordOps, Ssl3RecordOps, Tls1RecordOps};
pub use queue::{OutboundQueue, QueuedRecord};
pub use seq::SequenceNumber;

use crate::RecordError;

/// Maximum plaintext fragment size (2^14 bytes).
pub const MAX_PLAINTEXT_LENGTH: usize = 16384;

/// Maximum expansion a cipher may add to a fragment (2^11 bytes).
pub const MAX_CIPHERTEXT_OVERHEAD: usize = 2048;

/// Maximum ciphertext fragment size accepted from the wire.
pub const MAX_CIPHERTEXT_LENGTH: usize = MAX_PLAINTEXT_LENGTH + MAX_CIPHERTEXT_OVERHEAD;

/// Record header size: content_type(1) + version(2) + length(2).
pub const RECORD_HEADER_LEN: usize = 5;

/// Record content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

impl ContentType {
    pub fn from_u8(v: u8) -> Result<Self, RecordError> {
        match v {
            20 => Ok(ContentType::ChangeCipherSpec),
            21 => Ok(ContentType::Alert),
            22 => Ok(ContentType::Handshake),
            23 => Ok(ContentType::ApplicationData),
            _ => Err(RecordError::Decode(format!("unknown content type {v}"))),
        }
    }
}

/// SSL 3.0 / TLS record header.
///
/// `type(1) || version(2) || length(2)`, all big-endian. The length counts
/// every byte after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: u16,
    pub length: u16,
}

impl RecordHeader {
    /// Parse a header from the first five bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < RECORD_HEADER_LEN {
            return Err(RecordError::Decode("incomplete record header".into()));
        }
        Ok(Self {
            content_type: ContentType::from_u8(data[0])?,
            version: u16::from_be_bytes([data[1], data[2]]),
            length: u16::from_be_bytes([data[3], data[4]]),
        })
    }

    /// Write the header into the first five bytes of `out`.
    pub fn encode_into(&self, out: &mut [u8]) {
        out[0] = self.content_type as u8;
        out[1..3].copy_from_slice(&self.version.to_be_bytes());
        out[3..5].copy_from_slice(&self.length.to_be_bytes());
    }

    pub fn encode(&self) -> [u8; RECORD_HEADER_LEN] {
        let mut out = [0u8; RECORD_HEADER_LEN];
        self.encode_into(&mut out);
        out
    }
}
