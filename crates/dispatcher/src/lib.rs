//! # Dispatcher
//!
//! Stream client implementations - the only code that touches the
//! network.
//!
//! Responsibilities:
//! - Resolve the backend partition topology
//! - Transmit one batch to one partition as a single backend call
//! - Report success or transmission error; never retry internally

pub mod clients;

pub use clients::{
    DeliveredBatch, LogStreamClient, MemoryStreamClient, NetworkClientConfig, NetworkStreamClient,
};
pub use contracts::{CapturedEvent, EventStreamClient, PartitionId, WireFormat};
