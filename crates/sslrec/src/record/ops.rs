//! Per-version record operations.
//!
//! SSL 3.0 and TLS share the record codec but differ in the MAC
//! construction and in how strictly block padding is checked. The
//! operations are looked up once per cipher state from a fixed table.

use sslrec_types::MacAlgId;
use tracing::trace;

use super::codec;
use super::queue::OutboundQueue;
use super::ContentType;
use crate::crypt::CipherState;
use crate::mac::{mac_length_field, MacContext, MacHeader, Ssl3Mac, Tls1Mac, MAX_MAC_HEADER_LEN};
use crate::{ProtocolVersion, RecordError};

/// Record-protection operations for one protocol version.
pub trait RecordOps: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Whether every padding byte must equal the padding length.
    ///
    /// SSL 3.0 padding content is arbitrary; only its length is checked.
    fn strict_padding(&self) -> bool;

    /// Build and install the MAC context for `state`.
    fn init_mac(&self, state: &mut CipherState) -> Result<(), RecordError>;

    /// Release the MAC context of `state`.
    fn free_mac(&self, state: &mut CipherState) {
        state.take_mac_context();
    }

    /// Compute the record MAC over `data` into `out` using the sequence
    /// number of `state`.
    ///
    /// `version` is the header version being authenticated: the state's own
    /// version when writing, the received header's when reading. SSL 3.0
    /// does not cover it.
    fn compute_mac(
        &self,
        state: &CipherState,
        content_type: ContentType,
        version: u16,
        data: &[u8],
        out: &mut [u8],
    ) -> Result<(), RecordError>;

    /// Protect `plaintext`, frame it, and append it to `queue`.
    fn write_record(
        &self,
        content_type: ContentType,
        plaintext: &[u8],
        state: &mut CipherState,
        queue: &mut OutboundQueue,
    ) -> Result<(), RecordError> {
        codec::write_record(self, content_type, plaintext, state, queue)
    }

    /// Decrypt and verify a record payload in place, returning the content.
    ///
    /// `version` is the version field of the received header.
    fn decrypt_record<'a>(
        &self,
        content_type: ContentType,
        version: u16,
        payload: &'a mut [u8],
        state: &mut CipherState,
    ) -> Result<&'a [u8], RecordError> {
        codec::decrypt_record(self, content_type, version, payload, state)
    }
}

/// SSL 3.0 record operations.
#[derive(Debug)]
pub struct Ssl3RecordOps;

/// TLS 1.0 record operations, also used for TLS 1.1/1.2 and DTLS framing.
#[derive(Debug)]
pub struct Tls1RecordOps;

static SSL3_RECORD_OPS: Ssl3RecordOps = Ssl3RecordOps;
static TLS1_RECORD_OPS: Tls1RecordOps = Tls1RecordOps;

/// Look up the record operations for a negotiated version.
pub fn record_ops(version: ProtocolVersion) -> &'static dyn RecordOps {
    match version {
        ProtocolVersion::Ssl30 => &SSL3_RECORD_OPS,
        ProtocolVersion::Tls10
        | ProtocolVersion::Tls11
        | ProtocolVersion::Tls12
        | ProtocolVersion::Dtls10 => &TLS1_RECORD_OPS,
    }
}

fn mismatched_context() -> RecordError {
    RecordError::Internal("MAC context does not match protocol version".into())
}

impl RecordOps for Ssl3RecordOps {
    fn name(&self) -> &'static str {
        "SSL 3.0"
    }

    fn strict_padding(&self) -> bool {
        false
    }

    fn init_mac(&self, state: &mut CipherState) -> Result<(), RecordError> {
        let Some(hash) = state.mac_alg().hash() else {
            return Ok(());
        };
        let ctx = Ssl3Mac::new(hash, state.mac_secret())?;
        state.set_mac_context(MacContext::Ssl3(ctx));
        trace!(mac = ?state.mac_alg(), "ssl3 mac initialised");
        Ok(())
    }

    fn compute_mac(
        &self,
        state: &CipherState,
        content_type: ContentType,
        _version: u16,
        data: &[u8],
        out: &mut [u8],
    ) -> Result<(), RecordError> {
        if state.mac_alg() == MacAlgId::Null {
            return Ok(());
        }
        let Some(MacContext::Ssl3(mac)) = state.mac_context() else {
            return Err(mismatched_context());
        };
        let header = MacHeader {
            seq: state.sequence(),
            content_type,
            version: None,
            length: mac_length_field(data.len())?,
        };
        let mut buf = [0u8; MAX_MAC_HEADER_LEN];
        let n = header.encode(&mut buf);
        mac.compute(&buf[..n], data, out)?;
        Ok(())
    }
}

impl RecordOps for Tls1RecordOps {
    fn name(&self) -> &'static str {
        "TLS"
    }

    fn strict_padding(&self) -> bool {
        true
    }

    fn init_mac(&self, state: &mut CipherState) -> Result<(), RecordError> {
        let Some(hash) = state.mac_alg().hash() else {
            return Ok(());
        };
        let ctx = Tls1Mac::new(hash, state.mac_secret())?;
        state.set_mac_context(MacContext::Tls1(ctx));
        trace!(mac = ?state.mac_alg(), "hmac initialised");
        Ok(())
    }

    fn compute_mac(
        &self,
        state: &CipherState,
        content_type: ContentType,
        version: u16,
        data: &[u8],
        out: &mut [u8],
    ) -> Result<(), RecordError> {
        if state.mac_alg() == MacAlgId::Null {
            return Ok(());
        }
        let Some(MacContext::Tls1(mac)) = state.mac_context() else {
            return Err(mismatched_context());
        };
        let header = MacHeader {
            seq: state.sequence(),
            content_type,
            version: Some(version),
            length: mac_length_field(data.len())?,
        };
        let mut buf = [0u8; MAX_MAC_HEADER_LEN];
        let n = header.encode(&mut buf);
        mac.compute(&buf[..n], data, out)?;
        Ok(())
    }
}
