//! Per-direction cipher state.
//!
//! A `CipherState` is built by the handshake layer when a cipher suite is
//! activated and consumed by the record codec. It owns the keyed bulk cipher,
//! the MAC secret and MAC context, and the direction's sequence number.

use std::fmt;
use std::sync::Arc;

use sslrec_crypto::block::new_block_cipher;
use sslrec_crypto::cbc::Cbc;
use sslrec_crypto::StreamCipher;
use sslrec_types::{CipherAlgId, CryptoError, MacAlgId};
use tracing::debug;
use zeroize::Zeroize;

use super::{CipherShape, CipherSuiteParams};
use crate::mac::MacContext;
use crate::record::ops::{record_ops, RecordOps};
use crate::record::seq::SequenceNumber;
use crate::{CipherSuite, ProtocolVersion, RecordError};

/// The negotiated bulk cipher, one variant per record shape.
pub enum BulkCipher {
    /// Keystream cipher; the null cipher is a keystream of zeros.
    Stream(Box<dyn StreamCipher>),
    /// CBC block cipher with its running chaining value.
    Block(Cbc),
    /// AEAD cipher. Only its framing is known to this layer.
    Aead { tag_len: usize },
}

/// Identity transform for `*_WITH_NULL_*` suites.
struct NullCipher;

impl StreamCipher for NullCipher {
    fn apply_keystream(&mut self, _data: &mut [u8]) -> Result<(), CryptoError> {
        Ok(())
    }
}

impl BulkCipher {
    fn new(params: &CipherSuiteParams, key: &[u8], iv: &[u8]) -> Result<Self, RecordError> {
        let cipher = match params.shape() {
            CipherShape::Stream => match params.cipher {
                CipherAlgId::Rc4_128 => {
                    BulkCipher::Stream(Box::new(sslrec_crypto::arc4::Rc4_128::new(key)?))
                }
                _ => BulkCipher::Stream(Box::new(NullCipher)),
            },
            CipherShape::Block { .. } => {
                let block = new_block_cipher(params.cipher, key)?;
                BulkCipher::Block(Cbc::new(block, iv)?)
            }
            CipherShape::Aead { tag_len } => BulkCipher::Aead { tag_len },
        };
        Ok(cipher)
    }

    pub fn shape(&self) -> CipherShape {
        match self {
            BulkCipher::Stream(_) => CipherShape::Stream,
            BulkCipher::Block(cbc) => CipherShape::Block {
                block_size: cbc.block_size(),
            },
            BulkCipher::Aead { tag_len } => CipherShape::Aead { tag_len: *tag_len },
        }
    }
}

/// Cipher state for one direction of a connection.
pub struct CipherState {
    version: ProtocolVersion,
    suite: CipherSuite,
    ops: &'static dyn RecordOps,
    cipher: BulkCipher,
    mac_alg: MacAlgId,
    mac_secret: Vec<u8>,
    mac: Option<Arc<MacContext>>,
    seq: SequenceNumber,
}

impl Drop for CipherState {
    fn drop(&mut self) {
        self.mac_secret.zeroize();
    }
}

impl fmt::Debug for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherState")
            .field("version", &self.version)
            .field("suite", &self.suite)
            .field("shape", &self.shape())
            .field("mac_alg", &self.mac_alg)
            .field("seq", &self.seq.as_u64())
            .finish()
    }
}

impl CipherState {
    /// The initial, unprotected state: null cipher, no MAC.
    pub fn null(version: ProtocolVersion) -> Self {
        Self {
            version,
            suite: CipherSuite::NULL_WITH_NULL_NULL,
            ops: record_ops(version),
            cipher: BulkCipher::Stream(Box::new(NullCipher)),
            mac_alg: MacAlgId::Null,
            mac_secret: Vec::new(),
            mac: None,
            seq: SequenceNumber::default(),
        }
    }

    /// Key a cipher state for `suite` and run the version's MAC
    /// initialisation.
    ///
    /// `key`, `iv` and `mac_secret` must have the lengths the suite
    /// requires; for AEAD suites `iv` is the fixed IV and `mac_secret` is
    /// empty.
    pub fn new(
        version: ProtocolVersion,
        suite: CipherSuite,
        key: &[u8],
        iv: &[u8],
        mac_secret: &[u8],
    ) -> Result<Self, RecordError> {
        let params = CipherSuiteParams::from_suite(suite)?;
        if key.len() != params.key_len {
            return Err(CryptoError::InvalidKeyLength {
                expected: params.key_len,
                got: key.len(),
            }
            .into());
        }
        if iv.len() != params.iv_len {
            return Err(CryptoError::InvalidIvLength {
                expected: params.iv_len,
                got: iv.len(),
            }
            .into());
        }
        if mac_secret.len() != params.mac_len {
            return Err(CryptoError::InvalidKeyLength {
                expected: params.mac_len,
                got: mac_secret.len(),
            }
            .into());
        }

        let ops = record_ops(version);
        let mut state = Self {
            version,
            suite,
            ops,
            cipher: BulkCipher::new(&params, key, iv)?,
            mac_alg: params.mac,
            mac_secret: mac_secret.to_vec(),
            mac: None,
            seq: SequenceNumber::default(),
        };
        ops.init_mac(&mut state)?;
        debug!(
            version = ?version,
            suite = format_args!("{:#06x}", suite.0),
            shape = ?state.shape(),
            "cipher state keyed"
        );
        Ok(state)
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// The version-specific operations this state was keyed with.
    pub fn ops(&self) -> &'static dyn RecordOps {
        self.ops
    }

    pub fn shape(&self) -> CipherShape {
        self.cipher.shape()
    }

    pub fn mac_alg(&self) -> MacAlgId {
        self.mac_alg
    }

    /// Bytes of MAC appended to every record.
    pub fn mac_size(&self) -> usize {
        self.mac_alg.digest_size()
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.seq
    }

    pub fn set_sequence(&mut self, seq: SequenceNumber) {
        self.seq = seq;
    }

    pub fn advance_sequence(&mut self) -> Result<(), RecordError> {
        self.seq.increment()
    }

    /// Returns true while a MAC context is installed.
    pub fn has_mac_context(&self) -> bool {
        self.mac.is_some()
    }

    /// Retire this state, releasing its MAC context.
    pub fn retire(mut self) {
        let ops = self.ops;
        ops.free_mac(&mut self);
        debug!(version = ?self.version, "cipher state retired");
    }

    pub(crate) fn cipher_mut(&mut self) -> &mut BulkCipher {
        &mut self.cipher
    }

    pub(crate) fn mac_secret(&self) -> &[u8] {
        &self.mac_secret
    }

    pub(crate) fn mac_context(&self) -> Option<&MacContext> {
        self.mac.as_deref()
    }

    pub(crate) fn set_mac_context(&mut self, ctx: MacContext) {
        self.mac = Some(Arc::new(ctx));
    }

    pub(crate) fn take_mac_context(&mut self) -> Option<Arc<MacContext>> {
        self.mac.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_state() {
        let state = CipherState::null(ProtocolVersion::Tls10);
        assert_eq!(state.shape(), CipherShape::Stream);
        assert_eq!(state.mac_size(), 0);
        assert!(!state.has_mac_context());
        assert_eq!(state.sequence().as_u64(), 0);
    }

    #[test]
    fn test_new_block_state_installs_mac() {
        let state = CipherState::new(
            ProtocolVersion::Tls10,
            CipherSuite::RSA_WITH_AES_128_CBC_SHA,
            &[0x11; 16],
            &[0x22; 16],
            &[0x33; 20],
        )
        .unwrap();
        assert_eq!(state.shape(), CipherShape::Block { block_size: 16 });
        assert_eq!(state.mac_size(), 20);
        assert!(state.has_mac_context());
    }

    #[test]
    fn test_new_rejects_bad_key_length() {
        let err = CipherState::new(
            ProtocolVersion::Tls10,
            CipherSuite::RSA_WITH_RC4_128_SHA,
            &[0x11; 5],
            &[],
            &[0x33; 20],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Crypto(CryptoError::InvalidKeyLength { expected: 16, got: 5 })
        ));
    }

    #[test]
    fn test_new_rejects_bad_mac_secret_length() {
        assert!(CipherState::new(
            ProtocolVersion::Ssl30,
            CipherSuite::RSA_WITH_NULL_MD5,
            &[],
            &[],
            &[0x33; 20],
        )
        .is_err());
    }

    #[test]
    fn test_free_mac_releases_context() {
        let mut state = CipherState::new(
            ProtocolVersion::Ssl30,
            CipherSuite::RSA_WITH_RC4_128_MD5,
            &[0x11; 16],
            &[],
            &[0x33; 16],
        )
        .unwrap();
        assert!(state.has_mac_context());
        let ops = state.ops();
        ops.free_mac(&mut state);
        assert!(!state.has_mac_context());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let state = CipherState::new(
            ProtocolVersion::Tls10,
            CipherSuite::RSA_WITH_NULL_SHA,
            &[],
            &[],
            &[0xAB; 20],
        )
        .unwrap();
        let dbg = format!("{state:?}");
        assert!(!dbg.contains("171"));
        assert!(dbg.contains("Tls10"));
    }
}
