//! Record MAC engines.
//!
//! Both engines authenticate `header || content`, where the header is the
//! transient [`MacHeader`]. SSL 3.0 uses the nested pad1/pad2 construction
//! ([`ssl3`]); TLS uses HMAC ([`tls1`]).

pub mod ssl3;
pub mod tls1;

pub use ssl3::Ssl3Mac;
pub use tls1::Tls1Mac;

use crate::record::seq::SequenceNumber;
use crate::record::ContentType;
use crate::RecordError;

/// Largest MAC header: seq(8) || type(1) || version(2) || length(2).
pub const MAX_MAC_HEADER_LEN: usize = 13;

/// Keyed MAC state installed in a cipher state by `init_mac`.
pub enum MacContext {
    Ssl3(Ssl3Mac),
    Tls1(Tls1Mac),
}

/// The pseudo-header covered by the record MAC.
///
/// SSL 3.0 omits the version.
#[derive(Debug, Clone, Copy)]
pub struct MacHeader {
    pub seq: SequenceNumber,
    pub content_type: ContentType,
    pub version: Option<u16>,
    pub length: u16,
}

impl MacHeader {
    /// Serialize into `out`, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8; MAX_MAC_HEADER_LEN]) -> usize {
        out[..8].copy_from_slice(&self.seq.to_be_bytes());
        out[8] = self.content_type as u8;
        let mut pos = 9;
        if let Some(version) = self.version {
            out[pos..pos + 2].copy_from_slice(&version.to_be_bytes());
            pos += 2;
        }
        out[pos..pos + 2].copy_from_slice(&self.length.to_be_bytes());
        pos + 2
    }
}

/// Length field for the MAC header. Content never exceeds a record.
pub(crate) fn mac_length_field(content_len: usize) -> Result<u16, RecordError> {
    u16::try_from(content_len)
        .map_err(|_| RecordError::RecordOverflow(format!("content length {content_len}")))
}
