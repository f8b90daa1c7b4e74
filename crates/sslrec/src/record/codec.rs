//! Record protection shared by SSL 3.0 and TLS.
//!
//! Write: `header || [explicit IV] || E(content || MAC || [padding || padding_length])`
//!
//! Read: decrypt in place, locate the content boundary, then check padding
//! and MAC together. A padding failure and a MAC failure produce the same
//! error and run the same steps.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};
use tracing::trace;
use zeroize::Zeroize;

use super::dtls::DtlsRecordHeader;
use super::ops::RecordOps;
use super::queue::OutboundQueue;
use super::{ContentType, RecordHeader, MAX_CIPHERTEXT_LENGTH, MAX_PLAINTEXT_LENGTH};
use crate::buffer::SslBuffer;
use crate::crypt::{BulkCipher, CipherShape, CipherState, AEAD_EXPLICIT_NONCE_LEN};
use crate::{CryptoError, RecordError};

/// Longest padding a TLS block record can carry, including the length byte.
const MAX_PADDING_SCAN: usize = 256;

/// Where each part of an outgoing record lands in the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WriteLayout {
    header_len: usize,
    /// Explicit IV block or AEAD explicit nonce.
    explicit_len: usize,
    content_len: usize,
    mac_len: usize,
    /// Padding bytes excluding the length byte; `None` for non-block shapes.
    padding_len: Option<usize>,
    /// AEAD tag length.
    tag_len: usize,
}

impl WriteLayout {
    fn new(state: &CipherState, content_len: usize) -> Self {
        let version = state.version();
        let mac_len = state.mac_size();
        let mut layout = Self {
            header_len: version.header_len(),
            explicit_len: 0,
            content_len,
            mac_len,
            padding_len: None,
            tag_len: 0,
        };
        match state.shape() {
            CipherShape::Stream => {}
            CipherShape::Block { block_size } => {
                if version.uses_explicit_iv() {
                    layout.explicit_len = block_size;
                }
                // (content + mac + padding + 1) % block_size == 0
                let used = (content_len + mac_len + 1) % block_size;
                layout.padding_len = Some((block_size - used) % block_size);
            }
            CipherShape::Aead { tag_len } => {
                layout.explicit_len = AEAD_EXPLICIT_NONCE_LEN;
                layout.mac_len = 0;
                layout.tag_len = tag_len;
            }
        }
        layout
    }

    fn content_start(&self) -> usize {
        self.header_len + self.explicit_len
    }

    fn mac_start(&self) -> usize {
        self.content_start() + self.content_len
    }

    fn padding_start(&self) -> usize {
        self.mac_start() + self.mac_len
    }

    /// Everything after the header.
    fn body_len(&self) -> usize {
        let padding = self.padding_len.map_or(0, |p| p + 1);
        self.explicit_len + self.content_len + self.mac_len + padding + self.tag_len
    }

    fn total_len(&self) -> usize {
        self.header_len + self.body_len()
    }
}

/// Protect `plaintext` with `state`, frame it, and append it to `queue`.
///
/// The write sequence number is advanced only after the record is queued.
/// On error nothing is queued and the partially built buffer is wiped.
pub fn write_record<O: RecordOps + ?Sized>(
    ops: &O,
    content_type: ContentType,
    plaintext: &[u8],
    state: &mut CipherState,
    queue: &mut OutboundQueue,
) -> Result<(), RecordError> {
    if plaintext.len() > MAX_PLAINTEXT_LENGTH {
        return Err(RecordError::RecordOverflow(format!(
            "plaintext length {} exceeds {MAX_PLAINTEXT_LENGTH}",
            plaintext.len()
        )));
    }
    if !queue.has_room() {
        return Err(RecordError::RecordOverflow("outbound queue full".into()));
    }
    if let CipherShape::Aead { .. } = state.shape() {
        return Err(RecordError::Internal(
            "AEAD records are not produced by the shared record writer".into(),
        ));
    }
    let next_seq = state.sequence().next()?;

    let layout = WriteLayout::new(state, plaintext.len());
    let body_len = u16::try_from(layout.body_len()).map_err(|_| {
        RecordError::RecordOverflow(format!("record body length {}", layout.body_len()))
    })?;

    let mut buf = SslBuffer::alloc(layout.total_len());
    let version = state.version();
    if version.is_dtls() {
        DtlsRecordHeader {
            content_type,
            version: version.wire(),
            sequence: state.sequence(),
            length: body_len,
        }
        .encode_into(&mut buf[..layout.header_len]);
    } else {
        RecordHeader {
            content_type,
            version: version.wire(),
            length: body_len,
        }
        .encode_into(&mut buf[..layout.header_len]);
    }

    let explicit = layout.header_len..layout.content_start();
    match state.shape() {
        CipherShape::Block { .. } => {
            getrandom::getrandom(&mut buf[explicit])
                .map_err(|_| RecordError::Crypto(CryptoError::RandFail))?;
        }
        CipherShape::Aead { .. } => {
            buf[explicit].copy_from_slice(&state.sequence().to_be_bytes());
        }
        CipherShape::Stream => {}
    }

    buf[layout.content_start()..layout.mac_start()].copy_from_slice(plaintext);

    if let Some(padding_len) = layout.padding_len {
        buf[layout.padding_start()..].fill(padding_len as u8);
    }

    // The encrypted region starts at the explicit IV: the random block is
    // chained into CBC like any other block.
    let region = layout.header_len..layout.total_len();

    if layout.mac_len > 0 {
        let mac_range = layout.mac_start()..layout.padding_start();
        let (head, tail) = buf.split_at_mut(layout.mac_start());
        ops.compute_mac(
            state,
            content_type,
            version.wire(),
            &head[layout.content_start()..],
            &mut tail[..mac_range.len()],
        )?;
    }

    match state.cipher_mut() {
        BulkCipher::Stream(cipher) => cipher.apply_keystream(&mut buf[region])?,
        BulkCipher::Block(cbc) => cbc.encrypt(&mut buf[region])?,
        BulkCipher::Aead { .. } => {
            return Err(RecordError::Internal(
                "AEAD records are not produced by the shared record writer".into(),
            ));
        }
    }

    let total = buf.len();
    queue.push(buf)?;
    state.set_sequence(next_seq);
    trace!(
        ops = ops.name(),
        content_type = ?content_type,
        len = plaintext.len(),
        total,
        "record queued"
    );
    Ok(())
}

/// Outcome of the combined padding and MAC check.
///
/// Both checks always run; `padding_ok` and `mac_ok` are evaluated
/// independently and combined once.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordCheck {
    pub(crate) padding_ok: bool,
    pub(crate) mac_ok: bool,
    pub(crate) content_len: usize,
}

impl RecordCheck {
    fn is_valid(&self) -> bool {
        self.padding_ok & self.mac_ok
    }
}

/// Decrypt and verify `payload` (the bytes after the record header) in
/// place, returning the content region.
///
/// `version` is the version field of the received header and is covered
/// by the MAC. The read sequence number is used but not advanced; the
/// caller advances it once the record is accepted.
pub fn decrypt_record<'a, O: RecordOps + ?Sized>(
    ops: &O,
    content_type: ContentType,
    version: u16,
    payload: &'a mut [u8],
    state: &mut CipherState,
) -> Result<&'a [u8], RecordError> {
    if payload.len() > MAX_CIPHERTEXT_LENGTH {
        return Err(RecordError::RecordOverflow(format!(
            "ciphertext length {} exceeds {MAX_CIPHERTEXT_LENGTH}",
            payload.len()
        )));
    }

    let shape = state.shape();
    let explicit_len = match shape {
        CipherShape::Stream => 0,
        CipherShape::Block { block_size } => {
            if payload.is_empty() || payload.len() % block_size != 0 {
                return Err(RecordError::RecordOverflow(format!(
                    "block ciphertext length {} is not a positive multiple of {block_size}",
                    payload.len()
                )));
            }
            if state.version().uses_explicit_iv() {
                block_size
            } else {
                0
            }
        }
        CipherShape::Aead { .. } => {
            return Err(RecordError::Internal(
                "AEAD records are not opened by the shared record reader".into(),
            ));
        }
    };

    match state.cipher_mut() {
        BulkCipher::Stream(cipher) => cipher
            .apply_keystream(payload)
            .map_err(RecordError::DecryptionFailed)?,
        BulkCipher::Block(cbc) => cbc.decrypt(payload).map_err(RecordError::DecryptionFailed)?,
        BulkCipher::Aead { .. } => {
            return Err(RecordError::Internal(
                "AEAD records are not opened by the shared record reader".into(),
            ));
        }
    }

    let payload: &'a [u8] = payload;
    let record = payload.get(explicit_len..).ok_or(RecordError::ClosedAbort)?;
    let check = check_record(ops, content_type, version, record, state)?;
    if !check.is_valid() {
        trace!(ops = ops.name(), content_type = ?content_type, "bad record MAC");
        return Err(RecordError::BadRecordMac);
    }
    if check.content_len > MAX_PLAINTEXT_LENGTH {
        return Err(RecordError::RecordOverflow(format!(
            "plaintext length {} exceeds {MAX_PLAINTEXT_LENGTH}",
            check.content_len
        )));
    }
    trace!(
        ops = ops.name(),
        content_type = ?content_type,
        len = check.content_len,
        "record opened"
    );
    Ok(&record[..check.content_len])
}

/// Locate the content boundary of a decrypted `record` (explicit IV already
/// removed) and run the padding and MAC checks.
///
/// Fails early only when the record cannot even hold its MAC, which the
/// sender's framing rules out independently of any secret.
pub(crate) fn check_record<O: RecordOps + ?Sized>(
    ops: &O,
    content_type: ContentType,
    version: u16,
    record: &[u8],
    state: &CipherState,
) -> Result<RecordCheck, RecordError> {
    let mac_len = state.mac_size();
    // content || padding || padding_length; checked so a short record can
    // never produce an out-of-range content length.
    let avail = record
        .len()
        .checked_sub(mac_len)
        .ok_or(RecordError::ClosedAbort)?;

    let (padding_ok, content_len) = match state.shape() {
        CipherShape::Block { block_size } => {
            if avail == 0 {
                return Err(RecordError::ClosedAbort);
            }
            check_padding(record, avail, block_size, ops.strict_padding())
        }
        _ => (Choice::from(1), avail),
    };

    let mut mac_ok = Choice::from(1);
    if mac_len > 0 {
        let mut expected = [0u8; 64];
        ops.compute_mac(
            state,
            content_type,
            version,
            &record[..content_len],
            &mut expected[..mac_len],
        )?;
        mac_ok = record[content_len..content_len + mac_len].ct_eq(&expected[..mac_len]);
        expected.zeroize();
    }

    Ok(RecordCheck {
        padding_ok: bool::from(padding_ok),
        mac_ok: bool::from(mac_ok),
        content_len,
    })
}

/// Check block padding without branching on its value.
///
/// `avail` is the length of `content || padding || padding_length`. Returns
/// the padding verdict and the content length; on a bad padding length the
/// content length is `avail` so the MAC is still computed over a
/// well-defined range.
fn check_padding(record: &[u8], avail: usize, block_size: usize, strict: bool) -> (Choice, usize) {
    let n = record.len();
    let pad = record[n - 1];
    let pad_total = pad as u64 + 1;

    let mut ok = !pad_total.ct_gt(&(avail as u64));
    if !strict {
        // SSL 3.0: padding is shorter than one block.
        ok &= !pad_total.ct_gt(&(block_size as u64));
    }

    if strict {
        let scan = n.min(MAX_PADDING_SCAN);
        for i in 0..scan {
            let in_padding = pad_total.ct_gt(&(i as u64));
            let matches = record[n - 1 - i].ct_eq(&pad);
            ok &= !in_padding | matches;
        }
    }

    let strip = u64::conditional_select(&0, &pad_total, ok);
    (ok, avail - strip as usize)
}
