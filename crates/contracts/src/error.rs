//! Layered error definitions
//!
//! Categorized by source: config / interception / partition / transmission

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Interception Errors =====
    /// Caller passed no activity where one is required
    #[error("activity is required")]
    MissingActivity,

    // ===== Partition Errors =====
    /// Backend partition topology could not be resolved
    #[error("partition discovery failed: {message}")]
    PartitionDiscovery { message: String },

    // ===== Transmission Errors =====
    /// A batch could not be delivered to its partition
    #[error("transmission via '{client}' failed: {message}")]
    Transmission { client: String, message: String },

    /// Envelope serialization error
    #[error("serialization error: {message}")]
    Serialization { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create partition discovery error
    pub fn partition_discovery(message: impl Into<String>) -> Self {
        Self::PartitionDiscovery {
            message: message.into(),
        }
    }

    /// Create transmission error
    pub fn transmission(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transmission {
            client: client.into(),
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
