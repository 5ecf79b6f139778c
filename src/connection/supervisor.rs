//! Connection supervisor

use super::driver::{Driver, Handle};
use super::state::ConnectionState;
use crate::config::{redact_address, ConfigStore, ConnectOptions, Configuration, SetupOutcome};
use crate::logging::{LogSink, Logger, TracingSink};
use crate::metrics::{counters, histograms, labels};
use crate::Error;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::Instrument;

type Outcome<D> = Result<<D as Driver>::Handle, <D as Driver>::Error>;

/// Caller parked behind an in-flight attempt
type Waiter<D> = oneshot::Sender<Outcome<D>>;

/// State plus the data each state owns
enum Slot<D: Driver> {
    Disconnected,
    Connecting {
        attempt: u64,
        waiters: VecDeque<Waiter<D>>,
    },
    Connected {
        generation: u64,
        handle: D::Handle,
    },
}

impl<D: Driver> Slot<D> {
    fn state(&self) -> ConnectionState {
        match self {
            Slot::Disconnected => ConnectionState::Disconnected,
            Slot::Connecting { .. } => ConnectionState::Connecting,
            Slot::Connected { .. } => ConnectionState::Connected,
        }
    }
}

struct Inner<D: Driver> {
    slot: Slot<D>,
    attempts: u64,
}

impl<D: Driver> Inner<D> {
    /// Replace the slot, returning the previous one
    fn move_to(&mut self, next: Slot<D>) -> crate::Result<Slot<D>> {
        let mut state = self.slot.state();
        state.transition(next.state())?;
        Ok(std::mem::replace(&mut self.slot, next))
    }

    fn current_attempt(&self) -> Option<u64> {
        match &self.slot {
            Slot::Connecting { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }
}

struct Shared<D: Driver> {
    driver: D,
    config: ConfigStore,
    log: Logger,
    inner: Mutex<Inner<D>>,
}

/// What a caller does after inspecting the slot
enum Role<D: Driver> {
    Cached(D::Handle),
    Follower(u64, oneshot::Receiver<Outcome<D>>),
    Leader(u64),
}

/// Owner of the process-wide connection
///
/// Clones share the same connection and configuration; construct one at
/// startup and hand clones to every call site.
///
/// A connect attempt is started by the first caller that finds the supervisor
/// disconnected. Callers arriving while it runs wait in FIFO order and receive
/// the same outcome, so at most one driver `connect` is in flight at any time.
pub struct Supervisor<D: Driver> {
    shared: Arc<Shared<D>>,
}

impl<D: Driver> Clone for Supervisor<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D: Driver> Supervisor<D> {
    /// Create a supervisor logging through [`TracingSink`] once verbose
    pub fn new(driver: D) -> Self {
        Self::builder(driver).build()
    }

    /// Create a builder
    pub fn builder(driver: D) -> SupervisorBuilder<D> {
        SupervisorBuilder {
            driver,
            sink: Arc::new(TracingSink),
        }
    }

    /// Record address, options and verbosity; only the first call takes effect
    ///
    /// `options: None` selects [`ConnectOptions::default`]. Nothing connects
    /// here; the first `with_connection` call does.
    pub fn setup(
        &self,
        address: impl Into<String>,
        options: Option<ConnectOptions>,
        verbose: bool,
    ) -> SetupOutcome {
        let outcome = self.shared.config.setup(address, options, verbose);
        if outcome == SetupOutcome::Initialized && verbose {
            self.shared.log.enable();
            self.shared.log.log(format_args!("verbose mode is on"));
        }
        outcome
    }

    /// Get the live connection handle, connecting if needed
    ///
    /// Driver failures are returned as-is and leave the supervisor
    /// disconnected; the next call tries again.
    ///
    /// Must be called from within a tokio runtime: a task watching the
    /// handle's close notification is spawned after each successful connect.
    pub async fn with_connection(&self) -> Result<D::Handle, D::Error> {
        let shared = &self.shared;
        shared.log.log(format_args!("connection requested"));

        loop {
            let role: Role<D> = {
                let mut guard = shared.inner.lock();
                let inner = &mut *guard;
                match &mut inner.slot {
                    Slot::Connected { handle, .. } => Role::Cached(handle.clone()),
                    Slot::Connecting { attempt, waiters } => {
                        let (tx, rx) = oneshot::channel();
                        waiters.push_back(tx);
                        Role::Follower(*attempt, rx)
                    }
                    Slot::Disconnected => {
                        inner.attempts += 1;
                        let attempt = inner.attempts;
                        inner
                            .move_to(Slot::Connecting {
                                attempt,
                                waiters: VecDeque::new(),
                            })
                            .map_err(D::Error::from)?;
                        Role::Leader(attempt)
                    }
                }
            };

            match role {
                Role::Cached(handle) => {
                    counters::cache_hit();
                    shared.log.log(format_args!("using cached connection"));
                    return Ok(handle);
                }
                Role::Follower(attempt, rx) => {
                    counters::caller_queued();
                    shared
                        .log
                        .log(format_args!("waiting for connect attempt #{}", attempt));
                    match rx.await {
                        Ok(outcome) => return outcome,
                        // Leader went away; start over
                        Err(_) => continue,
                    }
                }
                Role::Leader(attempt) => {
                    return self
                        .lead(attempt)
                        .instrument(tracing::debug_span!("connect_attempt", attempt))
                        .await;
                }
            }
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().slot.state()
    }

    /// Callers waiting on the in-flight attempt
    pub fn queued_callers(&self) -> usize {
        match &self.shared.inner.lock().slot {
            Slot::Connecting { waiters, .. } => waiters.len(),
            _ => 0,
        }
    }

    /// Effective configuration, `None` before the first `setup`
    pub fn config(&self) -> Option<Arc<Configuration>> {
        self.shared.config.read()
    }

    /// The driver this supervisor connects through
    pub fn driver(&self) -> &D {
        &self.shared.driver
    }

    /// Run one connect attempt and deliver its outcome to every waiter
    async fn lead(&self, attempt: u64) -> Outcome<D> {
        let mut guard = AttemptGuard {
            shared: &self.shared,
            attempt,
            armed: true,
        };

        let result = match self.shared.config.read() {
            Some(config) => self.connect(&config).await,
            None => {
                counters::connect_failed(labels::REASON_NOT_CONFIGURED);
                Err(D::Error::from(Error::NotConfigured))
            }
        };

        guard.armed = false;
        self.settle(attempt, result)
    }

    async fn connect(&self, config: &Configuration) -> Outcome<D> {
        let shared = &self.shared;
        counters::connect_attempted();
        shared.log.log(format_args!(
            "connecting to {}",
            redact_address(&config.address)
        ));

        let started = Instant::now();
        let connect = shared.driver.connect(&config.address, &config.options);
        let (result, reason) = match config.options.connect_timeout() {
            Some(limit) => match tokio::time::timeout(limit, connect).await {
                Ok(result) => (result, labels::REASON_DRIVER),
                Err(_) => (
                    Err(D::Error::from(Error::ConnectTimeout(limit))),
                    labels::REASON_TIMEOUT,
                ),
            },
            None => (connect.await, labels::REASON_DRIVER),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                counters::connect_succeeded();
                histograms::connect_duration(labels::OUTCOME_OK, elapsed_ms);
                tracing::debug!(elapsed_ms, "driver connected");
            }
            Err(e) => {
                counters::connect_failed(reason);
                histograms::connect_duration(labels::OUTCOME_ERROR, elapsed_ms);
                tracing::debug!(elapsed_ms, reason, error = %e, "driver connect failed");
            }
        }
        result
    }

    /// Publish the outcome of `attempt`
    fn settle(&self, attempt: u64, result: Outcome<D>) -> Outcome<D> {
        let shared = &self.shared;
        let waiters = {
            let mut inner = shared.inner.lock();
            if inner.current_attempt() != Some(attempt) {
                tracing::warn!(attempt, "attempt no longer owns the connection state");
                return result;
            }

            let next = match &result {
                Ok(handle) => Slot::Connected {
                    generation: attempt,
                    handle: handle.clone(),
                },
                Err(_) => Slot::Disconnected,
            };
            match inner.move_to(next) {
                Ok(Slot::Connecting { waiters, .. }) => waiters,
                Ok(_) => VecDeque::new(),
                Err(e) => return Err(D::Error::from(e)),
            }
        };

        match &result {
            Ok(handle) => {
                shared.log.log(format_args!("connected"));
                self.watch_close(attempt, handle);
            }
            Err(e) => shared.log.log(format_args!("cannot connect: {}", e)),
        }

        histograms::queue_drained(waiters.len());
        for waiter in waiters {
            // Receiver gone means that caller was cancelled
            let _ = waiter.send(result.clone());
        }
        result
    }

    /// Invalidate the cached handle once its transport closes
    fn watch_close(&self, generation: u64, handle: &D::Handle) {
        let closed = handle.closed();
        let shared: Weak<Shared<D>> = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            closed.await;
            if let Some(shared) = shared.upgrade() {
                shared.on_closed(generation);
            }
        });
    }
}

impl<D: Driver> Shared<D> {
    fn on_closed(&self, generation: u64) {
        let invalidated = {
            let mut inner = self.inner.lock();
            let current = match &inner.slot {
                Slot::Connected { generation, .. } => Some(*generation),
                _ => None,
            };
            current == Some(generation) && inner.move_to(Slot::Disconnected).is_ok()
        };

        if invalidated {
            counters::disconnect_detected();
            self.log.log(format_args!("connection was closed"));
        } else {
            tracing::debug!(generation, "ignoring close of a stale handle");
        }
    }

    fn abandon(&self, attempt: u64) {
        let abandoned = {
            let mut inner = self.inner.lock();
            // Dropping the waiters wakes them so one can take over
            inner.current_attempt() == Some(attempt) && inner.move_to(Slot::Disconnected).is_ok()
        };

        if abandoned {
            counters::connect_failed(labels::REASON_ABANDONED);
            self.log
                .log(format_args!("connect attempt #{} abandoned", attempt));
        }
    }
}

/// Resets `Connecting` if the leader is dropped mid-attempt
struct AttemptGuard<'a, D: Driver> {
    shared: &'a Shared<D>,
    attempt: u64,
    armed: bool,
}

impl<D: Driver> Drop for AttemptGuard<'_, D> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.abandon(self.attempt);
        }
    }
}

impl<D: Driver> std::fmt::Debug for Supervisor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("state", &self.state())
            .field("queued_callers", &self.queued_callers())
            .field("log", &self.shared.log)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Supervisor`]
pub struct SupervisorBuilder<D: Driver> {
    driver: D,
    sink: Arc<dyn LogSink>,
}

impl<D: Driver> SupervisorBuilder<D> {
    /// Where verbose messages go (default: [`TracingSink`])
    pub fn sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Shared sink variant, for sinks the caller keeps a handle to
    pub fn shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the supervisor, initially disconnected and unconfigured
    pub fn build(self) -> Supervisor<D> {
        Supervisor {
            shared: Arc::new(Shared {
                driver: self.driver,
                config: ConfigStore::new(),
                log: Logger::new(self.sink),
                inner: Mutex::new(Inner {
                    slot: Slot::Disconnected,
                    attempts: 0,
                }),
            }),
        }
    }
}
