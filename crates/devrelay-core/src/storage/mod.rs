//! Storage layer
//!
//! Handles the SQLite store: a single serialized connection, the versioned
//! schema migration engine, and the accessors over the three record sets
//! (config entries, trusted devices, notifications).
//!
//! ## Architecture
//!
//! - **StorageHandle**: owns the one connection; all statements execute
//!   through it, one at a time
//! - **Schema migrations**: run on open, before the handle is handed out
//! - **ConfigStore / DeviceRegistry / NotificationLedger**: borrow the
//!   handle per call and hold no state of their own

pub mod devices;
pub mod error;
pub mod handle;
pub mod notifications;
pub mod schema;
pub mod settings;

pub use devices::DeviceRegistry;
pub use error::{StorageError, StorageResult};
pub use handle::StorageHandle;
pub use notifications::NotificationLedger;
pub use settings::ConfigStore;
