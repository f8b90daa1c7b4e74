//! DTLS record header.
//!
//! The DTLS header is 13 bytes:
//! `content_type(1) || version(2) || sequence(8) || length(2)`
//!
//! The explicit sequence is the 16-bit epoch followed by the 48-bit record
//! counter, i.e. the same 64-bit value the MAC covers. Records are always
//! emitted whole; fragment reassembly lives above this layer.

use super::ContentType;
use crate::record::seq::SequenceNumber;
use crate::RecordError;

/// DTLS record header length: 13 bytes.
pub const DTLS_RECORD_HEADER_LEN: usize = 13;

/// A parsed DTLS record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtlsRecordHeader {
    pub content_type: ContentType,
    pub version: u16,
    pub sequence: SequenceNumber,
    pub length: u16,
}

impl DtlsRecordHeader {
    pub fn parse(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < DTLS_RECORD_HEADER_LEN {
            return Err(RecordError::Decode("incomplete DTLS record header".into()));
        }
        let mut seq = [0u8; 8];
        seq.copy_from_slice(&data[3..11]);
        Ok(Self {
            content_type: ContentType::from_u8(data[0])?,
            version: u16::from_be_bytes([data[1], data[2]]),
            sequence: SequenceNumber::from_be_bytes(seq),
            length: u16::from_be_bytes([data[11], data[12]]),
        })
    }

    pub fn encode_into(&self, out: &mut [u8]) {
        out[0] = self.content_type as u8;
        out[1..3].copy_from_slice(&self.version.to_be_bytes());
        out[3..11].copy_from_slice(&self.sequence.to_be_bytes());
        out[11..13].copy_from_slice(&self.length.to_be_bytes());
    }

    pub fn epoch(&self) -> u16 {
        (self.sequence.as_u64() >> 48) as u16
    }
}
