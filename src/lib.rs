//! lazylink: one shared, lazily opened, self-healing database connection
//!
//! A [`Supervisor`] owns the only connection a process keeps to its database.
//! The first caller of [`Supervisor::with_connection`] opens it through a
//! user-provided [`Driver`]; every later caller gets the cached handle until
//! the driver reports that the transport closed, after which the next caller
//! reconnects.
//!
//! Callers arriving while a connect attempt is in flight are queued and all
//! receive the outcome of that single attempt.
//!
//! # Example
//!
//! ```no_run
//! # use lazylink::{Driver, Supervisor};
//! # async fn example<D: Driver>(driver: D) -> Result<(), D::Error> {
//! let supervisor = Supervisor::new(driver);
//! supervisor.setup("mongodb://localhost:27017/app", None, true);
//!
//! let handle = supervisor.with_connection().await?;
//! # let _ = handle;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{ConfigStore, ConnectOptions, Configuration, SetupOutcome, StoreState};
pub use connection::{ConnectionState, Driver, Handle, Supervisor, SupervisorBuilder};
pub use error::{Error, Result};
pub use logging::{LogSink, SilentSink, TracingSink};
