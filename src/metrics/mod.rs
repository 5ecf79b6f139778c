//! Metrics for the connection supervisor
//!
//! Recorded through the `metrics` facade. Nothing is collected unless the
//! host application installs a recorder (Prometheus exporter, etc.).

pub mod counters;
pub mod histograms;
pub mod labels;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        counters::connect_attempted();
        counters::connect_failed(labels::REASON_TIMEOUT);
        histograms::connect_duration(labels::OUTCOME_OK, 12);
        histograms::queue_drained(3);
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            labels::CONNECT_ATTEMPTED,
            labels::CONNECT_SUCCEEDED,
            labels::CONNECT_FAILED,
            labels::DISCONNECT_DETECTED,
            labels::CALLER_QUEUED,
            labels::CACHE_HIT,
            labels::CONNECT_DURATION,
            labels::QUEUE_DRAINED,
        ] {
            assert!(name.starts_with("lazylink_"), "{}", name);
        }
    }
}
