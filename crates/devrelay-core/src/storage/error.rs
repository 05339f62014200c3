//! Storage error handling
//!
//! Provides typed errors for storage operations. Constraint violations are
//! classified from SQLite's extended result codes so callers can tell a
//! duplicate pairing apart from a notification for an unknown device.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use rusqlite::ffi;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A schema migration statement failed
    ///
    /// Fatal for the open: the version marker has not advanced, so the
    /// failing step re-runs in full on the next open.
    #[error("Schema migration step {step} failed: {source}")]
    Migration {
        step: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Attempted to pair a device identifier that is already paired
    #[error("Device '{identifier}' is already paired")]
    DuplicateDevice { identifier: String },

    /// Attempted to store a notification for a device that is not paired
    #[error("Device '{identifier}' is not a trusted device")]
    UnknownDevice { identifier: String },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StorageError {
    /// Classify a SQLite error raised while inserting a row owned by
    /// `identifier`
    ///
    /// Unique/primary-key violations become [`StorageError::DuplicateDevice`],
    /// foreign-key violations become [`StorageError::UnknownDevice`], anything
    /// else passes through as [`StorageError::Database`].
    pub fn from_constraint(error: rusqlite::Error, identifier: &str) -> Self {
        match &error {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StorageError::DuplicateDevice {
                    identifier: identifier.to_string(),
                }
            }
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                StorageError::UnknownDevice {
                    identifier: identifier.to_string(),
                }
            }
            _ => StorageError::Database(error),
        }
    }

    /// Check if this error is a rejected operation (store state unchanged)
    /// rather than a storage failure
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            StorageError::DuplicateDevice { .. } | StorageError::UnknownDevice { .. }
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error::new(extended_code),
            Some("constraint failed".to_string()),
        )
    }

    #[test]
    fn test_primary_key_classified_as_duplicate() {
        let err = StorageError::from_constraint(
            sqlite_failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY),
            "dev1",
        );

        assert!(matches!(err, StorageError::DuplicateDevice { .. }));
        assert!(err.is_constraint());
        assert!(err.to_string().contains("dev1"));
    }

    #[test]
    fn test_unique_classified_as_duplicate() {
        let err =
            StorageError::from_constraint(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE), "dev1");

        assert!(matches!(err, StorageError::DuplicateDevice { .. }));
    }

    #[test]
    fn test_foreign_key_classified_as_unknown_device() {
        let err = StorageError::from_constraint(
            sqlite_failure(ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            "ghost",
        );

        assert!(matches!(err, StorageError::UnknownDevice { .. }));
        assert!(err.is_constraint());
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = StorageError::from_constraint(rusqlite::Error::QueryReturnedNoRows, "dev1");

        assert!(matches!(err, StorageError::Database(_)));
        assert!(!err.is_constraint());
    }

    #[test]
    fn test_migration_error_display() {
        let err = StorageError::Migration {
            step: 1,
            source: rusqlite::Error::QueryReturnedNoRows,
        };

        let msg = err.to_string();
        assert!(msg.contains("step 1"));
    }
}
