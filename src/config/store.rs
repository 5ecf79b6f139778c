//! Write-once configuration store

use super::options::ConnectOptions;
use parking_lot::RwLock;
use std::sync::Arc;

/// Effective configuration, fixed by the first `setup` call
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Address handed to the driver
    pub address: String,
    /// Options handed to the driver
    pub options: ConnectOptions,
    /// Whether verbose logging was requested
    pub verbose: bool,
}

/// Store lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No `setup` call has taken effect yet
    Uninitialized,
    /// Configuration recorded; further writes are ignored
    Initialized,
}

/// What a `setup` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// This call recorded the configuration (`Uninitialized -> Initialized`)
    Initialized,
    /// A previous call already did; nothing changed
    AlreadyInitialized,
}

/// Holds the address, options and verbosity; the first write wins
#[derive(Debug, Default)]
pub struct ConfigStore {
    slot: RwLock<Option<Arc<Configuration>>>,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the configuration unless one is already recorded
    ///
    /// `options: None` selects `ConnectOptions::default()`. Later calls are
    /// complete no-ops, whatever they pass.
    pub fn setup(
        &self,
        address: impl Into<String>,
        options: Option<ConnectOptions>,
        verbose: bool,
    ) -> SetupOutcome {
        let mut slot = self.slot.write();
        if slot.is_some() {
            return SetupOutcome::AlreadyInitialized;
        }

        *slot = Some(Arc::new(Configuration {
            address: address.into(),
            options: options.unwrap_or_default(),
            verbose,
        }));
        SetupOutcome::Initialized
    }

    /// Current configuration, `None` if never configured
    pub fn read(&self) -> Option<Arc<Configuration>> {
        self.slot.read().clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StoreState {
        if self.slot.read().is_some() {
            StoreState::Initialized
        } else {
            StoreState::Uninitialized
        }
    }
}
