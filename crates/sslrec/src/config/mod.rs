//! Record layer configuration with builder pattern.

use crate::record::queue::DEFAULT_MAX_QUEUED_RECORDS;
use crate::record::MAX_PLAINTEXT_LENGTH;
use crate::ProtocolVersion;

/// Record layer configuration.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    /// Version written into outgoing headers and used for the initial
    /// null cipher states.
    pub version: ProtocolVersion,
    /// Largest plaintext fragment per record. Never above 16384.
    pub max_fragment_size: usize,
    /// Reject incoming records whose header version differs from `version`.
    pub strict_version: bool,
    /// Upper bound on records waiting in the outbound queue.
    pub max_queued_records: usize,
}

impl RecordConfig {
    pub fn builder() -> RecordConfigBuilder {
        RecordConfigBuilder::default()
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `RecordConfig`.
#[derive(Debug)]
pub struct RecordConfigBuilder {
    version: ProtocolVersion,
    max_fragment_size: usize,
    strict_version: bool,
    max_queued_records: usize,
}

impl Default for RecordConfigBuilder {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::Tls10,
            max_fragment_size: MAX_PLAINTEXT_LENGTH,
            strict_version: true,
            max_queued_records: DEFAULT_MAX_QUEUED_RECORDS,
        }
    }
}

impl RecordConfigBuilder {
    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Values outside `1..=16384` are clamped.
    pub fn max_fragment_size(mut self, size: usize) -> Self {
        self.max_fragment_size = size.clamp(1, MAX_PLAINTEXT_LENGTH);
        self
    }

    pub fn strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }

    /// A bound of zero is raised to one.
    pub fn max_queued_records(mut self, max: usize) -> Self {
        self.max_queued_records = max.max(1);
        self
    }

    pub fn build(self) -> RecordConfig {
        RecordConfig {
            version: self.version,
            max_fragment_size: self.max_fragment_size,
            strict_version: self.strict_version,
            max_queued_records: self.max_queued_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = RecordConfig::builder().build();
        assert_eq!(config.version, ProtocolVersion::Tls10);
        assert_eq!(config.max_fragment_size, 16384);
        assert!(config.strict_version);
        assert_eq!(config.max_queued_records, 64);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = RecordConfig::builder()
            .version(ProtocolVersion::Ssl30)
            .max_fragment_size(512)
            .strict_version(false)
            .max_queued_records(4)
            .build();
        assert_eq!(config.version, ProtocolVersion::Ssl30);
        assert_eq!(config.max_fragment_size, 512);
        assert!(!config.strict_version);
        assert_eq!(config.max_queued_records, 4);
    }

    #[test]
    fn test_config_builder_clamps_limits() {
        let config = RecordConfig::builder()
            .max_fragment_size(1 << 20)
            .max_queued_records(0)
            .build();
        assert_eq!(config.max_fragment_size, MAX_PLAINTEXT_LENGTH);
        assert_eq!(config.max_queued_records, 1);

        let config = RecordConfig::builder().max_fragment_size(0).build();
        assert_eq!(config.max_fragment_size, 1);
    }
}
