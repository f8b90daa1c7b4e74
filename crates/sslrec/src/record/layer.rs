//! Record layer driver: owns the cipher states, the outbound queue and the
//! reusable read buffer, and moves records between them and a transport.

use std::io::{self, Read, Write};
use std::mem;

use tracing::{debug, trace};

use super::dtls::DtlsRecordHeader;
use super::queue::OutboundQueue;
use super::seq::SequenceNumber;
use super::{ContentType, RecordHeader, MAX_CIPHERTEXT_LENGTH};
use crate::alert::Alert;
use crate::buffer::SslBuffer;
use crate::config::RecordConfig;
use crate::crypt::CipherState;
use crate::{ProtocolVersion, RecordError};

/// Header fields the read path needs, for either header format.
#[derive(Debug, Clone, Copy)]
struct InboundHeader {
    content_type: ContentType,
    version: u16,
    length: usize,
    /// Explicit DTLS sequence number.
    sequence: Option<SequenceNumber>,
}

/// Record layer state for one connection.
pub struct RecordLayer {
    config: RecordConfig,
    write_state: CipherState,
    read_state: CipherState,
    /// Write state superseded by the last cipher change, kept for
    /// retransmission until the next change or an explicit retire.
    previous_write: Option<CipherState>,
    queue: OutboundQueue,
    read_buf: SslBuffer,
    /// Bytes of the current record already received into `read_buf`.
    read_filled: usize,
}

impl RecordLayer {
    /// Create a record layer with null cipher states in both directions.
    pub fn new(config: RecordConfig) -> Self {
        let version = config.version;
        Self {
            write_state: CipherState::null(version),
            read_state: CipherState::null(version),
            previous_write: None,
            queue: OutboundQueue::new(config.max_queued_records),
            read_buf: SslBuffer::new(),
            read_filled: 0,
            config,
        }
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn version(&self) -> ProtocolVersion {
        self.config.version
    }

    pub fn write_state(&self) -> &CipherState {
        &self.write_state
    }

    pub fn read_state(&self) -> &CipherState {
        &self.read_state
    }

    pub fn previous_write(&self) -> Option<&CipherState> {
        self.previous_write.as_ref()
    }

    pub fn write_sequence(&self) -> SequenceNumber {
        self.write_state.sequence()
    }

    pub fn read_sequence(&self) -> SequenceNumber {
        self.read_state.sequence()
    }

    /// Records waiting for the transport.
    pub fn queue(&self) -> &OutboundQueue {
        &self.queue
    }

    pub fn has_pending_output(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Install a new write cipher state.
    ///
    /// The superseded state moves to the retransmission slot with its MAC
    /// context; whatever occupied that slot is retired.
    pub fn activate_write(&mut self, state: CipherState) -> Result<(), RecordError> {
        self.check_state_version(&state)?;
        let superseded = mem::replace(&mut self.write_state, state);
        if let Some(old) = self.previous_write.replace(superseded) {
            old.retire();
        }
        debug!(
            suite = format_args!("{:#06x}", self.write_state.suite().0),
            "write cipher state activated"
        );
        Ok(())
    }

    /// Install a new read cipher state, retiring the old one.
    pub fn activate_read(&mut self, state: CipherState) -> Result<(), RecordError> {
        self.check_state_version(&state)?;
        let old = mem::replace(&mut self.read_state, state);
        old.retire();
        debug!(
            suite = format_args!("{:#06x}", self.read_state.suite().0),
            "read cipher state activated"
        );
        Ok(())
    }

    /// Drop the retransmission state, releasing its MAC context.
    pub fn retire_previous_write(&mut self) {
        if let Some(old) = self.previous_write.take() {
            old.retire();
        }
    }

    fn check_state_version(&self, state: &CipherState) -> Result<(), RecordError> {
        if state.version() != self.config.version {
            return Err(RecordError::Internal(format!(
                "cipher state for {:?} installed on a {:?} record layer",
                state.version(),
                self.config.version
            )));
        }
        Ok(())
    }

    /// Protect `data` and queue it, split into records of at most
    /// `max_fragment_size` bytes. Empty `data` produces one empty record.
    ///
    /// Queue capacity for every fragment is checked up front. A cipher
    /// failure part way leaves the fragments already written queued; the
    /// connection is unusable after such an error.
    pub fn write_record(&mut self, content_type: ContentType, data: &[u8]) -> Result<(), RecordError> {
        let fragment_size = self.config.max_fragment_size;
        let fragments = data.len().div_ceil(fragment_size).max(1);
        if fragments > self.queue.free_slots() {
            return Err(RecordError::RecordOverflow(format!(
                "{fragments} records do not fit in the outbound queue"
            )));
        }

        let ops = self.write_state.ops();
        if data.is_empty() {
            return ops.write_record(content_type, data, &mut self.write_state, &mut self.queue);
        }
        for fragment in data.chunks(fragment_size) {
            ops.write_record(content_type, fragment, &mut self.write_state, &mut self.queue)?;
        }
        Ok(())
    }

    /// Queue `alert` as an alert record under the current write state.
    pub fn write_alert(&mut self, alert: Alert) -> Result<(), RecordError> {
        self.write_record(ContentType::Alert, &alert.encode())
    }

    /// Send queued records to `transport`.
    ///
    /// Returns the number of bytes written. On `WouldBlock` the partial
    /// progress is kept and the error is returned; call again later.
    pub fn flush<W: Write + ?Sized>(&mut self, transport: &mut W) -> Result<usize, RecordError> {
        self.queue.flush(transport)
    }

    /// Decode one record from the front of `data`, decrypting in place.
    ///
    /// Returns the content type, the plaintext (a view into `data`) and the
    /// number of bytes consumed.
    pub fn open_record<'a>(
        &mut self,
        data: &'a mut [u8],
    ) -> Result<(ContentType, &'a [u8], usize), RecordError> {
        let header_len = self.config.version.header_len();
        let header = self.parse_header(data)?;
        let total = header_len + header.length;
        if data.len() < total {
            return Err(RecordError::Decode(format!(
                "incomplete record: need {total} bytes, have {}",
                data.len()
            )));
        }
        let content = open_payload(&mut self.read_state, &header, &mut data[header_len..total])?;
        Ok((header.content_type, content, total))
    }

    /// Read one record from `transport` into the internal buffer and open it.
    ///
    /// The plaintext view is valid until the next call. On `WouldBlock` or
    /// `Interrupted` the bytes received so far are kept and the next call
    /// resumes the same record.
    pub fn read_record<R: Read + ?Sized>(
        &mut self,
        transport: &mut R,
    ) -> Result<(ContentType, &[u8]), RecordError> {
        let header_len = self.config.version.header_len();
        let capacity = header_len + MAX_CIPHERTEXT_LENGTH;
        if self.read_buf.len() < capacity {
            self.read_buf.resize(capacity);
        }

        fill(transport, &mut self.read_buf[..header_len], &mut self.read_filled)?;
        let header = match self.parse_header(&self.read_buf[..header_len]) {
            Ok(header) => header,
            Err(e) => {
                self.read_filled = 0;
                return Err(e);
            }
        };
        let total = header_len + header.length;
        fill(transport, &mut self.read_buf[..total], &mut self.read_filled)?;
        self.read_filled = 0;

        trace!(content_type = ?header.content_type, len = header.length, "record received");
        let content = open_payload(
            &mut self.read_state,
            &header,
            &mut self.read_buf[header_len..total],
        )?;
        Ok((header.content_type, content))
    }

    fn parse_header(&self, data: &[u8]) -> Result<InboundHeader, RecordError> {
        let (content_type, version, length, sequence) = if self.config.version.is_dtls() {
            let h = DtlsRecordHeader::parse(data)?;
            (h.content_type, h.version, h.length, Some(h.sequence))
        } else {
            let h = RecordHeader::parse(data)?;
            (h.content_type, h.version, h.length, None)
        };

        if self.config.strict_version && version != self.config.version.wire() {
            return Err(RecordError::UnsupportedVersion(version));
        }
        let length = usize::from(length);
        if length > MAX_CIPHERTEXT_LENGTH {
            return Err(RecordError::RecordOverflow(format!(
                "record length {length} exceeds {MAX_CIPHERTEXT_LENGTH}"
            )));
        }
        Ok(InboundHeader {
            content_type,
            version,
            length,
            sequence,
        })
    }
}

/// Open `payload` with `state` and advance the read sequence on success.
///
/// A DTLS record carries its own sequence number, which is used for the MAC.
/// The state's sequence is untouched unless the record is accepted.
fn open_payload<'a>(
    state: &mut CipherState,
    header: &InboundHeader,
    payload: &'a mut [u8],
) -> Result<&'a [u8], RecordError> {
    let ops = state.ops();
    let saved = state.sequence();
    let seq = header.sequence.unwrap_or(saved);
    let next = seq.next()?;
    state.set_sequence(seq);
    match ops.decrypt_record(header.content_type, header.version, payload, state) {
        Ok(content) => {
            state.set_sequence(next);
            Ok(content)
        }
        Err(e) => {
            state.set_sequence(saved);
            Err(e)
        }
    }
}

/// Read from `transport` until `buf[..buf.len()]` is filled, tracking
/// progress in `filled` so a retried call resumes where it stopped.
fn fill<R: Read + ?Sized>(
    transport: &mut R,
    buf: &mut [u8],
    filled: &mut usize,
) -> Result<(), RecordError> {
    while *filled < buf.len() {
        match transport.read(&mut buf[*filled..]) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
            Ok(n) => *filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

impl std::fmt::Debug for RecordLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLayer")
            .field("config", &self.config)
            .field("write_state", &self.write_state)
            .field("read_state", &self.read_state)
            .field("previous_write", &self.previous_write.is_some())
            .field("queued", &self.queue.len())
            .finish()
    }
}
