//! Counter helpers

use super::labels;

/// A connect attempt started
pub fn connect_attempted() {
    metrics::counter!(labels::CONNECT_ATTEMPTED).increment(1);
}

/// A connect attempt produced a handle
pub fn connect_succeeded() {
    metrics::counter!(labels::CONNECT_SUCCEEDED).increment(1);
}

/// A connect attempt failed
pub fn connect_failed(reason: &'static str) {
    metrics::counter!(labels::CONNECT_FAILED, "reason" => reason).increment(1);
}

/// The cached handle was invalidated by a close notification
pub fn disconnect_detected() {
    metrics::counter!(labels::DISCONNECT_DETECTED).increment(1);
}

/// A caller was queued behind an in-flight attempt
pub fn caller_queued() {
    metrics::counter!(labels::CALLER_QUEUED).increment(1);
}

/// A caller was served from cache
pub fn cache_hit() {
    metrics::counter!(labels::CACHE_HIT).increment(1);
}
