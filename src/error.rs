//! Error types

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the supervisor itself
///
/// Failures reported by the driver are never converted into this type; they
/// reach the caller of `with_connection` unchanged. This type travels the other
/// way: drivers implement `From<Error>` so the supervisor's own failures can be
/// delivered on the driver's error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A connection was requested before any effective `setup` call
    #[error("connection requested before setup: no address configured")]
    NotConfigured,

    /// The driver did not finish connecting in time
    #[error("connect attempt timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Illegal state machine transition
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Option map could not be loaded
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ConnectTimeout(Duration::from_millis(250)).to_string(),
            "connect attempt timed out after 250ms"
        );
        assert!(Error::NotConfigured.to_string().contains("before setup"));
        assert_eq!(
            Error::Config("bad json".into()).to_string(),
            "config error: bad json"
        );
    }
}
