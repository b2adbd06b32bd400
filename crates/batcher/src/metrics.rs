//! Batcher metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::batcher::FlushTrigger;

/// Metrics for a single batcher instance
#[derive(Debug, Default)]
pub struct BatcherMetrics {
    /// Current buffer depth
    buffered_len: AtomicUsize,
    /// Total records accepted into the buffer
    enqueued_count: AtomicU64,
    /// Total records skipped for lack of a conversation
    skipped_count: AtomicU64,
    /// Total batches delivered
    batches_sent: AtomicU64,
    /// Total records delivered
    events_sent: AtomicU64,
    /// Delivered batches by trigger
    size_flushes: AtomicU64,
    timer_flushes: AtomicU64,
    forced_flushes: AtomicU64,
    /// Batches dropped on transmission failure
    send_failures: AtomicU64,
    /// Flushes aborted because the topology could not be resolved
    discovery_failures: AtomicU64,
}

impl BatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffered_len(&self) -> usize {
        self.buffered_len.load(Ordering::Relaxed)
    }

    pub fn set_buffered_len(&self, len: usize) {
        self.buffered_len.store(len, Ordering::Relaxed);
    }

    pub fn enqueued_count(&self) -> u64 {
        self.enqueued_count.load(Ordering::Relaxed)
    }

    pub fn inc_enqueued(&self) {
        self.enqueued_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    pub fn events_sent(&self) -> u64 {
        self.events_sent.load(Ordering::Relaxed)
    }

    /// Record a delivered batch
    pub fn record_batch_sent(&self, trigger: FlushTrigger, events: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.events_sent.fetch_add(events as u64, Ordering::Relaxed);
        let counter = match trigger {
            FlushTrigger::Size => &self.size_flushes,
            FlushTrigger::Timer => &self.timer_flushes,
            FlushTrigger::Forced => &self.forced_flushes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn size_flushes(&self) -> u64 {
        self.size_flushes.load(Ordering::Relaxed)
    }

    pub fn timer_flushes(&self) -> u64 {
        self.timer_flushes.load(Ordering::Relaxed)
    }

    pub fn forced_flushes(&self) -> u64 {
        self.forced_flushes.load(Ordering::Relaxed)
    }

    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    pub fn inc_send_failures(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn discovery_failures(&self) -> u64 {
        self.discovery_failures.load(Ordering::Relaxed)
    }

    pub fn inc_discovery_failures(&self) {
        self.discovery_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            buffered_len: self.buffered_len(),
            enqueued_count: self.enqueued_count(),
            skipped_count: self.skipped_count(),
            batches_sent: self.batches_sent(),
            events_sent: self.events_sent(),
            size_flushes: self.size_flushes(),
            timer_flushes: self.timer_flushes(),
            forced_flushes: self.forced_flushes(),
            send_failures: self.send_failures(),
            discovery_failures: self.discovery_failures(),
        }
    }
}

/// Snapshot of batcher metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub buffered_len: usize,
    pub enqueued_count: u64,
    pub skipped_count: u64,
    pub batches_sent: u64,
    pub events_sent: u64,
    pub size_flushes: u64,
    pub timer_flushes: u64,
    pub forced_flushes: u64,
    pub send_failures: u64,
    pub discovery_failures: u64,
}
