//! MemoryStreamClient - captures batches in memory
//!
//! Backend stand-in for tests and `simulate --dry-run`, with
//! injectable failure scenarios.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{CapturedEvent, ContractError, EventStreamClient, PartitionId};
use tracing::debug;

/// One batch as delivered to the in-memory backend
#[derive(Debug, Clone)]
pub struct DeliveredBatch {
    pub partition: PartitionId,
    pub events: Vec<CapturedEvent>,
}

/// In-memory stream client
///
/// Clones share the same captured state, so a test can hand one
/// clone to the batcher and inspect deliveries through another.
#[derive(Clone)]
pub struct MemoryStreamClient {
    name: String,
    partitions: Vec<PartitionId>,
    batches: Arc<Mutex<Vec<DeliveredBatch>>>,
    fail_discovery: Arc<AtomicBool>,
    fail_send: Arc<AtomicBool>,
    discovery_calls: Arc<AtomicU64>,
}

impl MemoryStreamClient {
    pub fn new(partition_count: usize) -> Self {
        Self {
            name: "memory".to_string(),
            partitions: (0..partition_count).map(PartitionId::from_index).collect(),
            batches: Arc::new(Mutex::new(Vec::new())),
            fail_discovery: Arc::new(AtomicBool::new(false)),
            fail_send: Arc::new(AtomicBool::new(false)),
            discovery_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Inject (or clear) discovery failure
    pub fn set_fail_discovery(&self, fail: bool) {
        self.fail_discovery.store(fail, Ordering::Relaxed);
    }

    /// Inject (or clear) transmission failure
    pub fn set_fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::Relaxed);
    }

    /// All delivered batches, in delivery order
    pub fn batches(&self) -> Vec<DeliveredBatch> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// Total events across all delivered batches
    pub fn delivered_events(&self) -> usize {
        self.batches.lock().unwrap().iter().map(|b| b.events.len()).sum()
    }

    /// Delivered batch counts keyed by partition, in partition order
    pub fn per_partition_counts(&self) -> Vec<(PartitionId, usize)> {
        let batches = self.batches.lock().unwrap();
        self.partitions
            .iter()
            .map(|p| {
                let count = batches.iter().filter(|b| &b.partition == p).count();
                (p.clone(), count)
            })
            .collect()
    }

    pub fn discovery_calls(&self) -> u64 {
        self.discovery_calls.load(Ordering::Relaxed)
    }
}

impl EventStreamClient for MemoryStreamClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn discover_partitions(&self) -> Result<Vec<PartitionId>, ContractError> {
        self.discovery_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_discovery.load(Ordering::Relaxed) {
            return Err(ContractError::partition_discovery(
                "memory backend configured to fail discovery",
            ));
        }
        Ok(self.partitions.clone())
    }

    async fn send_batch(
        &self,
        batch: &[CapturedEvent],
        partition: &PartitionId,
    ) -> Result<(), ContractError> {
        if self.fail_send.load(Ordering::Relaxed) {
            return Err(ContractError::transmission(
                &self.name,
                "memory backend configured to fail sends",
            ));
        }
        debug!(partition = %partition, events = batch.len(), "Batch captured");
        self.batches.lock().unwrap().push(DeliveredBatch {
            partition: partition.clone(),
            events: batch.to_vec(),
        });
        Ok(())
    }
}
