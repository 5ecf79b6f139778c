//! Metric names and label values

/// Connect attempts started
pub const CONNECT_ATTEMPTED: &str = "lazylink_connect_attempted_total";
/// Connect attempts that produced a handle
pub const CONNECT_SUCCEEDED: &str = "lazylink_connect_succeeded_total";
/// Connect attempts that failed
pub const CONNECT_FAILED: &str = "lazylink_connect_failed_total";
/// Close notifications that invalidated the cached handle
pub const DISCONNECT_DETECTED: &str = "lazylink_disconnect_detected_total";
/// Callers queued behind an in-flight attempt
pub const CALLER_QUEUED: &str = "lazylink_caller_queued_total";
/// Callers served from the cached handle
pub const CACHE_HIT: &str = "lazylink_cache_hit_total";

/// Connect attempt duration
pub const CONNECT_DURATION: &str = "lazylink_connect_duration_ms";
/// Queued callers released per attempt
pub const QUEUE_DRAINED: &str = "lazylink_queue_drained";

/// Driver returned an error
pub const REASON_DRIVER: &str = "driver";
/// Connect timeout expired
pub const REASON_TIMEOUT: &str = "timeout";
/// No address configured
pub const REASON_NOT_CONFIGURED: &str = "not_configured";
/// Leader dropped before the attempt resolved
pub const REASON_ABANDONED: &str = "abandoned";

/// Outcome label: success
pub const OUTCOME_OK: &str = "ok";
/// Outcome label: error
pub const OUTCOME_ERROR: &str = "error";
