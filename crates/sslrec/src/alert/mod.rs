//! Alert codes for record-layer failures.
//!
//! The record layer never sends alerts on its own. Callers map a
//! [`RecordError`] to an [`Alert`] and queue it with
//! [`RecordLayer::write_alert`](crate::record::RecordLayer::write_alert).

use crate::RecordError;

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

/// Alert descriptions raised by or relevant to the record layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertDescription {
    CloseNotify = 0,
    UnexpectedMessage = 10,
    BadRecordMac = 20,
    /// SSL 3.0 / TLS 1.0 only; later versions send `BadRecordMac`.
    DecryptionFailed = 21,
    RecordOverflow = 22,
    DecodeError = 50,
    ProtocolVersion = 70,
    InternalError = 80,
}

impl AlertDescription {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(AlertDescription::CloseNotify),
            10 => Ok(AlertDescription::UnexpectedMessage),
            20 => Ok(AlertDescription::BadRecordMac),
            21 => Ok(AlertDescription::DecryptionFailed),
            22 => Ok(AlertDescription::RecordOverflow),
            50 => Ok(AlertDescription::DecodeError),
            70 => Ok(AlertDescription::ProtocolVersion),
            80 => Ok(AlertDescription::InternalError),
            _ => Err(v),
        }
    }
}

/// A two-byte alert message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl Alert {
    pub fn fatal(description: AlertDescription) -> Self {
        Self {
            level: AlertLevel::Fatal,
            description,
        }
    }

    /// The fatal alert a peer should receive after `err`, or `None` when the
    /// error is a recoverable transport condition.
    pub fn for_error(err: &RecordError) -> Option<Self> {
        let code = err.alert_description()?;
        let description = AlertDescription::from_u8(code).unwrap_or(AlertDescription::InternalError);
        Some(Self::fatal(description))
    }

    /// Alert record body: `level || description`.
    pub fn encode(&self) -> [u8; 2] {
        [self.level as u8, self.description as u8]
    }
}
