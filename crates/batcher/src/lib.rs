//! # Batcher
//!
//! The batching activity dispatcher.
//!
//! Responsibilities:
//! - Buffer individual activity records without blocking producers
//! - Flush as a batch on size threshold or timer expiry, whichever
//!   fires first
//! - Spread successive batches across backend partitions in
//!   round-robin order

pub mod batcher;
pub mod metrics;
pub mod router;

pub use batcher::{ActivityBatcher, BatcherConfig, FlushTrigger};
pub use contracts::{Activity, CapturedEvent, EventStreamClient, PartitionId};
pub use metrics::{BatcherMetrics, MetricsSnapshot};
pub use router::PartitionRouter;
