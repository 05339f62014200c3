//! Unified storage interface
//!
//! The `Store` owns the configuration and the storage handle, and hands out
//! the record-set accessors. Construction runs the schema migrations to
//! completion; no accessor exists before the store is current.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open()?;  // Creates or migrates as needed
//!
//! store.devices().pair("dev1", "cert", "Phone", "android")?;
//! let paired = store.devices().list()?;
//! ```

use anyhow::{Context, Result};

use crate::config::Config;
use crate::storage::{ConfigStore, DeviceRegistry, NotificationLedger, StorageHandle};

/// Unified storage interface for DevRelay
pub struct Store {
    /// The serialized connection to the store file
    handle: StorageHandle,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store at the configured location, creating it if needed
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let handle = StorageHandle::open(&config)
            .with_context(|| format!("Failed to open store at {:?}", config.store_path()))?;

        Ok(Self { handle, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the underlying storage handle
    ///
    /// For callers that need the explicit transaction primitive.
    pub fn handle(&self) -> &StorageHandle {
        &self.handle
    }

    /// Key/value application settings
    pub fn settings(&self) -> ConfigStore<'_> {
        ConfigStore::new(&self.handle)
    }

    /// Trusted device registry
    pub fn devices(&self) -> DeviceRegistry<'_> {
        DeviceRegistry::new(&self.handle)
    }

    /// Per-device notification ledger
    pub fn notifications(&self) -> NotificationLedger<'_> {
        NotificationLedger::new(&self.handle)
    }
}
