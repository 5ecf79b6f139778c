//! Driver and handle seams
//!
//! The supervisor never talks to the network itself. A [`Driver`] opens the
//! transport and returns a [`Handle`]; the handle tells the supervisor when
//! the transport has gone away.

use crate::config::ConnectOptions;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::Display;

/// Live connection handed out to every caller
///
/// Clones must refer to the same underlying connection.
pub trait Handle: Clone + Send + Sync + 'static {
    /// Future resolving once the underlying transport has closed
    ///
    /// Called exactly once per successful connect. If the handle is already
    /// closed the future may resolve immediately.
    fn closed(&self) -> BoxFuture<'static, ()>;
}

/// Capability opening connections to the database
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Connection handle type
    type Handle: Handle;

    /// Connect failure type, surfaced to callers untouched
    ///
    /// `From<crate::Error>` carries the supervisor's own failures (missing
    /// setup, connect timeout) on the same channel.
    type Error: Clone + Display + From<crate::Error> + Send + Sync + 'static;

    /// Open a connection
    async fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<Self::Handle, Self::Error>;
}
