//! LogStreamClient - logs batch summaries via tracing
//!
//! Stand-in backend for dry runs and local debugging.

use contracts::{CapturedEvent, ContractError, EventStreamClient, PartitionId};
use tracing::{info, instrument};

/// Client that logs batch summaries instead of transmitting
pub struct LogStreamClient {
    name: String,
    partition_count: usize,
}

impl LogStreamClient {
    pub fn new(name: impl Into<String>, partition_count: usize) -> Self {
        Self {
            name: name.into(),
            partition_count,
        }
    }
}

impl EventStreamClient for LogStreamClient {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_client_discover", skip(self))]
    async fn discover_partitions(&self) -> Result<Vec<PartitionId>, ContractError> {
        Ok((0..self.partition_count)
            .map(PartitionId::from_index)
            .collect())
    }

    #[instrument(
        name = "log_client_send_batch",
        skip(self, batch),
        fields(client = %self.name, partition = %partition)
    )]
    async fn send_batch(
        &self,
        batch: &[CapturedEvent],
        partition: &PartitionId,
    ) -> Result<(), ContractError> {
        let first_channel = batch.first().map(|e| e.channel_id.as_str()).unwrap_or("-");
        info!(
            client = %self.name,
            partition = %partition,
            events = batch.len(),
            channel = first_channel,
            "Batch received"
        );
        Ok(())
    }
}
