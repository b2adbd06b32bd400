//! Configuration validation
//!
//! Validation rules:
//! - connection endpoint and entity_path non-empty
//! - batch_size >= 1, batch_interval_ms >= 1
//! - partition_count >= 1
//! - portal identity fields non-empty, tenant_id a valid GUID

use contracts::{ContractError, PortalConfig, RelayConfig};

/// Validate a RelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_connection(config)?;
    validate_batching(config)?;
    validate_stream(config)?;
    if let Some(ref portal) = config.portal {
        validate_portal(portal)?;
    }
    Ok(())
}

fn validate_connection(config: &RelayConfig) -> Result<(), ContractError> {
    if config.connection.endpoint.trim().is_empty() {
        return Err(ContractError::config_validation(
            "connection.endpoint",
            "endpoint must not be empty",
        ));
    }
    if config.connection.entity_path.trim().is_empty() {
        return Err(ContractError::config_validation(
            "connection.entity_path",
            "entity_path must not be empty",
        ));
    }
    Ok(())
}

fn validate_batching(config: &RelayConfig) -> Result<(), ContractError> {
    if config.batching.batch_size == 0 {
        return Err(ContractError::config_validation(
            "batching.batch_size",
            "batch_size must be at least 1",
        ));
    }
    if config.batching.batch_interval_ms == 0 {
        return Err(ContractError::config_validation(
            "batching.batch_interval_ms",
            "batch_interval_ms must be at least 1",
        ));
    }
    Ok(())
}

fn validate_stream(config: &RelayConfig) -> Result<(), ContractError> {
    if config.stream.partition_count == 0 {
        return Err(ContractError::config_validation(
            "stream.partition_count",
            "partition_count must be at least 1",
        ));
    }
    Ok(())
}

fn validate_portal(portal: &PortalConfig) -> Result<(), ContractError> {
    if uuid::Uuid::parse_str(&portal.tenant_id).is_err() {
        return Err(ContractError::config_validation(
            "portal.tenant_id",
            "tenant_id must be a valid GUID",
        ));
    }

    let required = [
        ("portal.subscription_id", &portal.subscription_id),
        ("portal.resource_group", &portal.resource_group),
        ("portal.component_name", &portal.component_name),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ContractError::config_validation(
                field,
                "value must not be empty",
            ));
        }
    }

    Ok(())
}
