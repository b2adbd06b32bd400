//! Relay metrics recording
//!
//! Counter/gauge/histogram helpers for the capture -> batch -> send
//! path, exported under the `transcript_relay_` prefix.

use metrics::{counter, gauge, histogram};

/// Record an activity accepted into the buffer
pub fn record_activity_captured(activity_type: &str) {
    counter!(
        "transcript_relay_activities_captured_total",
        "activity_type" => activity_type.to_string()
    )
    .increment(1);
}

/// Record an activity skipped for lack of an active conversation
pub fn record_activity_skipped() {
    counter!("transcript_relay_activities_skipped_total").increment(1);
}

/// Record a batch delivered to a partition
pub fn record_batch_sent(partition: &str, events: usize, trigger: &str) {
    counter!(
        "transcript_relay_batches_sent_total",
        "partition" => partition.to_string(),
        "trigger" => trigger.to_string()
    )
    .increment(1);

    counter!("transcript_relay_events_sent_total").increment(events as u64);

    histogram!("transcript_relay_batch_size").record(events as f64);
}

/// Record a failed batch transmission (batch dropped, at-most-once)
pub fn record_send_failure(client: &str) {
    counter!(
        "transcript_relay_send_failures_total",
        "client" => client.to_string()
    )
    .increment(1);
}

/// Record a failed partition discovery attempt
pub fn record_discovery_failure() {
    counter!("transcript_relay_discovery_failures_total").increment(1);
}

/// Record current buffer depth
pub fn record_buffer_depth(depth: usize) {
    gauge!("transcript_relay_buffer_depth").set(depth as f64);
}
