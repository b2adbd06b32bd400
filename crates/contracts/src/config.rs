//! RelayConfig - configuration surface for the relay pipeline
//!
//! Parsed by `config_loader` from TOML/JSON; legality rules live in
//! `config_loader::validator`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of events buffered before a size-triggered flush
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Default maximum delay before buffered events are flushed
pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 9500;

/// Default partition count for a configured (static) topology
pub const DEFAULT_PARTITION_COUNT: usize = 4;

/// Top-level relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub batching: BatchingConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    /// Analytics portal deep-link settings (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<PortalConfig>,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Backend endpoint (`host:port` for the bundled network client)
    pub endpoint: String,

    /// Target entity/topic name on the backend
    pub entity_path: String,
}

/// Buffer/flush policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Events buffered before a size-triggered flush
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum milliseconds before a timer-triggered flush
    #[serde(default = "default_batch_interval_ms")]
    pub batch_interval_ms: u64,
}

impl BatchingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.batch_interval_ms)
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_interval_ms: DEFAULT_BATCH_INTERVAL_MS,
        }
    }
}

/// Stream topology and wire settings for the bundled network client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Declared partition count (the topology is static for the
    /// process lifetime)
    #[serde(default = "default_partition_count")]
    pub partition_count: usize,

    #[serde(default)]
    pub wire_format: WireFormat,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
            wire_format: WireFormat::default(),
        }
    }
}

/// Serialization format for network transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// JSON (human-readable, larger)
    #[default]
    Json,
    /// Bincode (binary, compact)
    Bincode,
}

/// Analytics portal identity, used to build deep-link query URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// AAD tenant, must be a valid GUID
    pub tenant_id: String,

    pub subscription_id: String,

    pub resource_group: String,

    /// Analytics component (service) name
    pub component_name: String,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_batch_interval_ms() -> u64 {
    DEFAULT_BATCH_INTERVAL_MS
}

fn default_partition_count() -> usize {
    DEFAULT_PARTITION_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batching_defaults() {
        let config = BatchingConfig::default();
        assert_eq!(config.batch_size, 15);
        assert_eq!(config.batch_interval_ms, 9500);
        assert_eq!(config.interval(), Duration::from_millis(9500));
    }

    #[test]
    fn test_stream_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.partition_count, 4);
        assert_eq!(config.wire_format, WireFormat::Json);
    }

    #[test]
    fn test_toml_defaults_applied() {
        let config: RelayConfig = toml::from_str(
            r#"
[connection]
endpoint = "127.0.0.1:9100"
entity_path = "transcripts"
"#,
        )
        .unwrap();
        assert_eq!(config.batching.batch_size, 15);
        assert_eq!(config.stream.partition_count, 4);
        assert!(config.portal.is_none());
    }

    #[test]
    fn test_wire_format_lowercase_names() {
        let config: StreamConfig = toml::from_str("wire_format = \"bincode\"").unwrap();
        assert_eq!(config.wire_format, WireFormat::Bincode);
    }
}
