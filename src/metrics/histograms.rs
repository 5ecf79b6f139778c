//! Histogram helpers

use super::labels;

/// Time spent in one connect attempt
pub fn connect_duration(outcome: &'static str, duration_ms: u64) {
    metrics::histogram!(labels::CONNECT_DURATION, "outcome" => outcome).record(duration_ms as f64);
}

/// Number of queued callers released by one attempt
pub fn queue_drained(count: usize) {
    metrics::histogram!(labels::QUEUE_DRAINED).record(count as f64);
}
