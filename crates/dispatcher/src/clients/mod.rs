//! Stream client implementations

mod log;
mod memory;
mod network;

pub use log::LogStreamClient;
pub use memory::{DeliveredBatch, MemoryStreamClient};
pub use network::{NetworkClientConfig, NetworkStreamClient};
