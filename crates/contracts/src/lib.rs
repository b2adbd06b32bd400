//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Flow
//! - Host pipeline activities are normalized into [`Activity`] snapshots
//! - Each snapshot is wrapped in a [`CapturedEvent`] envelope at capture time
//! - Envelopes travel in batches to one [`EventStreamClient`] partition

mod activity;
mod config;
mod envelope;
mod error;
mod stream;

pub use activity::*;
pub use config::*;
pub use envelope::CapturedEvent;
pub use error::*;
pub use stream::{EventStreamClient, LocalEventStreamClient, PartitionId};
