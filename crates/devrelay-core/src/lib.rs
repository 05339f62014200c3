//! DevRelay Core Library
//!
//! This crate provides the persistence layer for DevRelay, a device-pairing
//! and notification-relay application. It manages a single local SQLite store
//! holding application configuration, trusted remote devices, and per-device
//! notifications.
//!
//! # Architecture
//!
//! - **SQLite**: the one on-disk store; every read reflects store state at
//!   call time (no caching layer)
//! - **Versioned schema migrations**: the store carries its own version
//!   marker and is brought up to the current structure on every open
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//!
//! // Pair a device
//! store.devices().pair("dev1", "cert", "Phone", "android")?;
//!
//! // Relay a notification
//! store.notifications().persist("dev1", "hi", "Chat", "chat-app", "msg-1")?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Data structures for devices and notifications
//! - `storage`: Storage handle, schema migrations, and record-set accessors
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{Notification, TrustedDevice};
pub use storage::{ConfigStore, DeviceRegistry, NotificationLedger, StorageError, StorageHandle};
pub use store::Store;
