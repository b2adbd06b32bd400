//! EventStreamClient trait - backend transmission interface
//!
//! The only seam that touches the network. Implementations own
//! connection management; the core only asks for topology and batch
//! transmission. No internal retry: delivery policy is layered by
//! callers that need it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CapturedEvent, ContractError};

/// Identifier of one backend stream shard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(String);

impl PartitionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional numeric partition naming ("0", "1", ...)
    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartitionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Backend stream transmission trait
///
/// All stream client implementations must implement this trait.
#[trait_variant::make(EventStreamClient: Send)]
pub trait LocalEventStreamClient: Sync {
    /// Client name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Resolve the ordered set of partition identifiers
    ///
    /// Idempotent; callers cache the result for the process lifetime
    /// (the topology is assumed static).
    ///
    /// # Errors
    /// Returns a discovery error when the topology cannot be resolved
    async fn discover_partitions(&self) -> Result<Vec<PartitionId>, ContractError>;

    /// Transmit a full batch to one partition as a single backend call
    ///
    /// # Errors
    /// Returns a transmission error; the call never retries internally
    async fn send_batch(
        &self,
        batch: &[CapturedEvent],
        partition: &PartitionId,
    ) -> Result<(), ContractError>;
}
