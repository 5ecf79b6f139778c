//! Connection management
//!
//! This module handles:
//! * Driver and handle seams (the transport itself lives elsewhere)
//! * State machine enforcement
//! * The supervisor: lazy connect, caching, close detection, queued callers

mod driver;
mod state;
mod supervisor;

pub use driver::{Driver, Handle};
pub use state::ConnectionState;
pub use supervisor::{Supervisor, SupervisorBuilder};
