//! Environment-variable overrides
//!
//! `RELAY_*` variables take precedence over file values, mirroring
//! deployment environments where endpoints and batch policy are
//! injected rather than baked into the config file.

use std::str::FromStr;

use contracts::{ContractError, RelayConfig};

/// Endpoint override
pub const ENV_ENDPOINT: &str = "RELAY_ENDPOINT";
/// Entity path override
pub const ENV_ENTITY_PATH: &str = "RELAY_ENTITY_PATH";
/// Batch size override
pub const ENV_BATCH_SIZE: &str = "RELAY_BATCH_SIZE";
/// Batch interval override (milliseconds)
pub const ENV_BATCH_INTERVAL_MS: &str = "RELAY_BATCH_INTERVAL_MS";
/// Partition count override
pub const ENV_PARTITION_COUNT: &str = "RELAY_PARTITION_COUNT";

/// Apply `RELAY_*` process-environment overrides to a parsed config
pub fn apply_env_overrides(config: &mut RelayConfig) -> Result<(), ContractError> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from any variable source (injectable for tests)
pub fn apply_overrides(
    config: &mut RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ContractError> {
    if let Some(endpoint) = lookup(ENV_ENDPOINT) {
        config.connection.endpoint = endpoint;
    }
    if let Some(entity_path) = lookup(ENV_ENTITY_PATH) {
        config.connection.entity_path = entity_path;
    }
    if let Some(value) = lookup(ENV_BATCH_SIZE) {
        config.batching.batch_size = parse_var(ENV_BATCH_SIZE, &value)?;
    }
    if let Some(value) = lookup(ENV_BATCH_INTERVAL_MS) {
        config.batching.batch_interval_ms = parse_var(ENV_BATCH_INTERVAL_MS, &value)?;
    }
    if let Some(value) = lookup(ENV_PARTITION_COUNT) {
        config.stream.partition_count = parse_var(ENV_PARTITION_COUNT, &value)?;
    }
    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ContractError> {
    value
        .parse()
        .map_err(|_| ContractError::config_validation(name, format!("invalid value '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{BatchingConfig, ConnectionConfig, StreamConfig};
    use std::collections::HashMap;

    fn base_config() -> RelayConfig {
        RelayConfig {
            connection: ConnectionConfig {
                endpoint: "127.0.0.1:9100".to_string(),
                entity_path: "transcripts".to_string(),
            },
            batching: BatchingConfig::default(),
            stream: StreamConfig::default(),
            portal: None,
        }
    }

    #[test]
    fn test_overrides_win_over_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENDPOINT, "10.1.1.1:9200"),
            (ENV_BATCH_SIZE, "30"),
            (ENV_BATCH_INTERVAL_MS, "1000"),
        ]
        .into_iter()
        .collect();

        let mut config = base_config();
        apply_overrides(&mut config, |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.connection.endpoint, "10.1.1.1:9200");
        assert_eq!(config.batching.batch_size, 30);
        assert_eq!(config.batching.batch_interval_ms, 1000);
        // untouched values keep their file/default settings
        assert_eq!(config.connection.entity_path, "transcripts");
        assert_eq!(config.stream.partition_count, 4);
    }

    #[test]
    fn test_unset_environment_is_noop() {
        let mut config = base_config();
        apply_overrides(&mut config, |_| None).unwrap();
        assert_eq!(config.batching.batch_size, 15);
    }

    #[test]
    fn test_unparseable_override_rejected() {
        let mut config = base_config();
        let result = apply_overrides(&mut config, |name| {
            (name == ENV_BATCH_SIZE).then(|| "not-a-number".to_string())
        });
        assert!(matches!(
            result,
            Err(ContractError::ConfigValidation { .. })
        ));
    }
}
