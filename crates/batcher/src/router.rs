//! PartitionRouter - round-robin assignment of batches to partitions
//!
//! The cursor is a monotonically increasing flush ticket taken inside
//! the batcher's flush critical section, so partition order follows
//! flush order even when transmission tasks interleave. Discovery is
//! lazy and cached for the life of the router; the backend topology
//! is assumed static for the process lifetime.

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ContractError, EventStreamClient, PartitionId};
use tokio::sync::OnceCell;
use tracing::debug;

/// Round-robin partition assignment with cached topology
pub struct PartitionRouter {
    /// Discovered partition identifiers, in backend order
    partitions: OnceCell<Vec<PartitionId>>,
    /// Flush ticket counter
    cursor: AtomicU64,
}

impl PartitionRouter {
    pub fn new() -> Self {
        Self {
            partitions: OnceCell::new(),
            cursor: AtomicU64::new(0),
        }
    }

    /// Take the next flush ticket
    ///
    /// Must be called inside the flush critical section; never
    /// suspends. Ticket order is flush order.
    pub fn advance(&self) -> u64 {
        self.cursor.fetch_add(1, Ordering::Relaxed)
    }

    /// Partition count, once discovery has completed
    pub fn partition_count(&self) -> Option<usize> {
        self.partitions.get().map(Vec::len)
    }

    /// Resolve the partition for a flush ticket
    ///
    /// The first caller performs discovery; concurrent callers
    /// suspend until it resolves. A failed discovery leaves the cache
    /// unset so a later flush retries it (the call is idempotent).
    pub async fn resolve<C>(&self, client: &C, ticket: u64) -> Result<PartitionId, ContractError>
    where
        C: EventStreamClient,
    {
        let partitions = self
            .partitions
            .get_or_try_init(|| async {
                let ids = client.discover_partitions().await?;
                if ids.is_empty() {
                    return Err(ContractError::partition_discovery(
                        "backend reported zero partitions",
                    ));
                }
                debug!(partitions = ids.len(), "Partition topology discovered");
                Ok(ids)
            })
            .await?;

        let index = (ticket % partitions.len() as u64) as usize;
        Ok(partitions[index].clone())
    }
}

impl Default for PartitionRouter {
    fn default() -> Self {
        Self::new()
    }
}
