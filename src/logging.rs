//! Log sink for supervisor progress messages
//!
//! The supervisor narrates what it does (connecting, connected, closed, ...)
//! through a [`LogSink`]. Nothing is emitted until verbose mode is switched on
//! by the first effective `setup` call.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Destination for supervisor messages
pub trait LogSink: Send + Sync {
    /// Write one message
    fn log(&self, message: &str);
}

/// Sink forwarding to `tracing` at INFO level, target `lazylink`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "lazylink", "{}", message);
    }
}

/// Sink discarding everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl LogSink for SilentSink {
    fn log(&self, _message: &str) {}
}

/// Gate in front of a sink, closed until verbose mode is on
pub(crate) struct Logger {
    verbose: AtomicBool,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub(crate) fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            verbose: AtomicBool::new(false),
            sink,
        }
    }

    pub(crate) fn enable(&self) {
        self.verbose.store(true, Ordering::Release);
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.verbose.load(Ordering::Acquire)
    }

    /// Format and forward, only when enabled
    pub(crate) fn log(&self, args: fmt::Arguments<'_>) {
        if self.is_enabled() {
            self.sink.log(&args.to_string());
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("verbose", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

/// Install a console subscriber filtered by `RUST_LOG` (default: `lazylink=info`)
///
/// Intended for binaries and demos; libraries embedding the supervisor should
/// install their own subscriber. Calling this twice is harmless.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lazylink=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
