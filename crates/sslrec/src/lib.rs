#![forbid(unsafe_code)]
#![doc = "SSL 3.0 / TLS 1.0 record layer: framing, MAC, padding and bulk encryption."]

pub mod alert;
pub mod buffer;
pub mod config;
pub mod crypt;
pub mod mac;
pub mod record;

pub use alert::{Alert, AlertDescription, AlertLevel};
pub use config::RecordConfig;
pub use crypt::{CipherState, CipherSuiteParams};
pub use record::{ContentType, RecordLayer};
pub use sslrec_types::{CryptoError, RecordError};

/// Record protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    Ssl30,
    Tls10,
    Tls11,
    Tls12,
    Dtls10,
}

impl ProtocolVersion {
    /// The two-byte version carried in record headers.
    pub const fn wire(self) -> u16 {
        match self {
            ProtocolVersion::Ssl30 => 0x0300,
            ProtocolVersion::Tls10 => 0x0301,
            ProtocolVersion::Tls11 => 0x0302,
            ProtocolVersion::Tls12 => 0x0303,
            ProtocolVersion::Dtls10 => 0xFEFF,
        }
    }

    pub fn from_wire(v: u16) -> Result<Self, RecordError> {
        match v {
            0x0300 => Ok(ProtocolVersion::Ssl30),
            0x0301 => Ok(ProtocolVersion::Tls10),
            0x0302 => Ok(ProtocolVersion::Tls11),
            0x0303 => Ok(ProtocolVersion::Tls12),
            0xFEFF => Ok(ProtocolVersion::Dtls10),
            _ => Err(RecordError::UnsupportedVersion(v)),
        }
    }

    pub const fn is_dtls(self) -> bool {
        matches!(self, ProtocolVersion::Dtls10)
    }

    /// Block-cipher records carry a leading random block (TLS 1.1+, DTLS).
    pub const fn uses_explicit_iv(self) -> bool {
        matches!(
            self,
            ProtocolVersion::Tls11 | ProtocolVersion::Tls12 | ProtocolVersion::Dtls10
        )
    }

    /// Size of the record header on the wire.
    pub const fn header_len(self) -> usize {
        if self.is_dtls() {
            record::dtls::DTLS_RECORD_HEADER_LEN
        } else {
            record::RECORD_HEADER_LEN
        }
    }
}

/// Cipher suite identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherSuite(pub u16);

impl CipherSuite {
    pub const NULL_WITH_NULL_NULL: Self = Self(0x0000);
    pub const RSA_WITH_NULL_MD5: Self = Self(0x0001);
    pub const RSA_WITH_NULL_SHA: Self = Self(0x0002);
    pub const RSA_WITH_RC4_128_MD5: Self = Self(0x0004);
    pub const RSA_WITH_RC4_128_SHA: Self = Self(0x0005);
    pub const RSA_WITH_DES_CBC_SHA: Self = Self(0x0009);
    pub const RSA_WITH_3DES_EDE_CBC_SHA: Self = Self(0x000A);
    pub const RSA_WITH_AES_128_CBC_SHA: Self = Self(0x002F);
    pub const RSA_WITH_AES_256_CBC_SHA: Self = Self(0x0035);
    pub const RSA_WITH_AES_128_GCM_SHA256: Self = Self(0x009C);
}
