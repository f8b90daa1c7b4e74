/// Cryptographic primitive errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid algorithm id")]
    InvalidAlgId,
    #[error("operation not supported")]
    NotSupported,
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length: expected {expected}, got {got}")]
    InvalidIvLength { expected: usize, got: usize },
    #[error("input length {len} is not a multiple of the block size {block_size}")]
    NotBlockAligned { len: usize, block_size: usize },
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },
    #[error("random number generation failed")]
    RandFail,
}

/// Record layer errors.
///
/// Each variant is one failure class a caller may need to tell apart when
/// choosing the alert to send. Padding and MAC failures share
/// [`RecordError::BadRecordMac`] and carry no detail.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record overflow: {0}")]
    RecordOverflow(String),
    #[error("decryption failed: {0}")]
    DecryptionFailed(CryptoError),
    #[error("bad record MAC")]
    BadRecordMac,
    #[error("connection closed: record length underflow")]
    ClosedAbort,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("unsupported protocol version: {0:#06x}")]
    UnsupportedVersion(u16),
    #[error("sequence number overflow")]
    SequenceOverflow,
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    /// Returns true for errors after which the connection must be torn down.
    ///
    /// Only transport errors that merely signal "try again" are recoverable.
    pub fn is_fatal(&self) -> bool {
        match self {
            RecordError::Io(e) => !matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::Interrupted
            ),
            _ => true,
        }
    }

    /// Alert description code a caller should send for this error, if any.
    ///
    /// Recoverable transport errors map to `None`.
    pub fn alert_description(&self) -> Option<u8> {
        let code = match self {
            RecordError::BadRecordMac => 20,
            RecordError::DecryptionFailed(_) => 21,
            RecordError::RecordOverflow(_) => 22,
            RecordError::Decode(_) => 50,
            RecordError::UnsupportedVersion(_) => 70,
            RecordError::ClosedAbort
            | RecordError::Internal(_)
            | RecordError::SequenceOverflow
            | RecordError::Crypto(_) => 80,
            RecordError::Io(_) => return None,
        };
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_would_block_is_not_fatal() {
        let e = RecordError::from(io::Error::from(io::ErrorKind::WouldBlock));
        assert!(!e.is_fatal());
        let e = RecordError::from(io::Error::from(io::ErrorKind::Interrupted));
        assert!(!e.is_fatal());
        let e = RecordError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(e.is_fatal());
        assert!(RecordError::BadRecordMac.is_fatal());
    }

    #[test]
    fn test_alert_codes() {
        assert_eq!(RecordError::BadRecordMac.alert_description(), Some(20));
        assert_eq!(
            RecordError::DecryptionFailed(CryptoError::NotSupported).alert_description(),
            Some(21)
        );
        assert_eq!(
            RecordError::RecordOverflow("x".into()).alert_description(),
            Some(22)
        );
        assert_eq!(RecordError::Decode("x".into()).alert_description(), Some(50));
        assert_eq!(
            RecordError::UnsupportedVersion(0x0200).alert_description(),
            Some(70)
        );
        assert_eq!(RecordError::ClosedAbort.alert_description(), Some(80));
        assert_eq!(
            RecordError::from(io::Error::from(io::ErrorKind::UnexpectedEof)).alert_description(),
            None
        );
    }

    #[test]
    fn test_bad_record_mac_message_has_no_detail() {
        assert_eq!(RecordError::BadRecordMac.to_string(), "bad record MAC");
    }
}
