//! Key/value config store
//!
//! Generic string settings persisted in the `config` table. The schema
//! migration engine stores its own version marker here, which is why the
//! lookup path must stay quiet when the table does not exist yet: on a
//! brand-new store nothing has been created at the time the marker is read.

use rusqlite::{ffi, Connection};

use crate::storage::error::StorageResult;
use crate::storage::handle::StorageHandle;

/// Accessor over the `config` table
///
/// Borrows the storage handle per call; holds no state of its own.
pub struct ConfigStore<'a> {
    handle: &'a StorageHandle,
}

impl<'a> ConfigStore<'a> {
    pub(crate) fn new(handle: &'a StorageHandle) -> Self {
        Self { handle }
    }

    /// Get the value stored under `key`, or `default` if absent
    ///
    /// A missing key is not an error; neither is a missing `config` table.
    pub fn load(&self, key: &str, default: &str) -> StorageResult<String> {
        self.handle
            .with_conn(|conn| Ok(load_value(conn, key)?.unwrap_or_else(|| default.to_string())))
    }

    /// Store `value` under `key`, replacing any existing value
    pub fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        self.handle.with_conn(|conn| save_value(conn, key, value))
    }
}

/// Look up a config value on a raw connection
///
/// Returns `None` for a missing key and for a store where the `config`
/// table has not been created yet.
pub(crate) fn load_value(conn: &Connection, key: &str) -> StorageResult<Option<String>> {
    let result = conn.query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
        row.get(0)
    });

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        // The statement is a fixed literal, so the only generic SQLITE_ERROR
        // it can raise at prepare time is the table not existing yet
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.extended_code == ffi::SQLITE_ERROR => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Upsert a config value on a raw connection
pub(crate) fn save_value(conn: &Connection, key: &str, value: &str) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO config (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}
