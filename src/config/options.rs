//! Connect options handed to the driver

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Options passed verbatim to [`Driver::connect`](crate::Driver::connect)
///
/// The supervisor only reads `connect_timeout_ms`; everything else is driver
/// territory. Use `ConnectOptions::builder()` to start from the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Let the driver re-open its socket on its own (default: true)
    pub auto_reconnect: bool,
    /// Enable TCP keep-alive on the driver socket (default: true)
    pub keep_alive: bool,
    /// Database-level options
    pub database: Map<String, Value>,
    /// Replica set options
    pub replica_set: Map<String, Value>,
    /// Routing (mongos-style) options
    pub routing: Map<String, Value>,
    /// Upper bound for a single connect attempt, in milliseconds
    pub connect_timeout_ms: Option<u64>,
    /// Driver-specific parameters
    pub params: Map<String, Value>,
}

impl Default for ConnectOptions {
    /// Default option set
    ///
    /// - `auto_reconnect`: true
    /// - `keep_alive`: true
    /// - `database`, `replica_set`, `routing`, `params`: empty
    /// - `connect_timeout_ms`: None (wait for the driver indefinitely)
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            keep_alive: true,
            database: Map::new(),
            replica_set: Map::new(),
            routing: Map::new(),
            connect_timeout_ms: None,
            params: Map::new(),
        }
    }
}

impl ConnectOptions {
    /// Create a builder seeded with the default option set
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Load options from a JSON object
    ///
    /// Fields missing from the document keep their default value.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazylink::ConnectOptions;
    ///
    /// let options = ConnectOptions::from_json(r#"{"keep_alive": false}"#).unwrap();
    /// assert!(!options.keep_alive);
    /// assert!(options.auto_reconnect);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid options: {}", e)))
    }

    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for `ConnectOptions`
#[derive(Debug, Clone)]
pub struct ConnectOptionsBuilder {
    options: ConnectOptions,
}

impl ConnectOptionsBuilder {
    /// Toggle driver-level automatic reconnection
    pub fn auto_reconnect(mut self, enabled: bool) -> Self {
        self.options.auto_reconnect = enabled;
        self
    }

    /// Toggle socket keep-alive
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.options.keep_alive = enabled;
        self
    }

    /// Set a database-level option
    pub fn database(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.database.insert(key.into(), value.into());
        self
    }

    /// Set a replica set option
    pub fn replica_set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.replica_set.insert(key.into(), value.into());
        self
    }

    /// Set a routing option
    pub fn routing(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.routing.insert(key.into(), value.into());
        self
    }

    /// Bound each connect attempt
    ///
    /// Default: None (no timeout)
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.options.connect_timeout_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Add a driver-specific parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.params.insert(key.into(), value.into());
        self
    }

    /// Build the options
    pub fn build(self) -> ConnectOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_option_set() {
        let options = ConnectOptions::default();
        assert!(options.auto_reconnect);
        assert!(options.keep_alive);
        assert!(options.replica_set.is_empty());
        assert!(options.routing.is_empty());
        assert!(options.database.is_empty());
        assert_eq!(options.connect_timeout(), None);
    }

    #[test]
    fn test_builder_fluent() {
        let options = ConnectOptions::builder()
            .keep_alive(false)
            .replica_set("name", "rs0")
            .routing("secondaryOk", true)
            .param("poolSize", 5)
            .connect_timeout(Duration::from_secs(3))
            .build();

        assert!(options.auto_reconnect);
        assert!(!options.keep_alive);
        assert_eq!(options.replica_set.get("name"), Some(&json!("rs0")));
        assert_eq!(options.routing.get("secondaryOk"), Some(&json!(true)));
        assert_eq!(options.params.get("poolSize"), Some(&json!(5)));
        assert_eq!(options.connect_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_from_json_partial_document() {
        let options =
            ConnectOptions::from_json(r#"{"auto_reconnect": false, "connect_timeout_ms": 1500}"#)
                .unwrap();
        assert!(!options.auto_reconnect);
        assert!(options.keep_alive);
        assert_eq!(options.connect_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ConnectOptions::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
