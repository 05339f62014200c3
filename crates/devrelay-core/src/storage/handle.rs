//! Storage handle
//!
//! Owns the single SQLite connection. All statement execution goes through
//! the handle, which serializes it behind a mutex: callers from separate
//! threads never interleave statements on the connection. Opening the
//! handle runs the schema migrations to completion before it is returned,
//! so every caller sees a current store.

use std::fs;
use std::sync::Mutex;

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema;

/// Exclusive owner of the store connection
pub struct StorageHandle {
    conn: Mutex<Connection>,
}

impl StorageHandle {
    /// Open or create the store file for the given configuration
    ///
    /// Creates the data directory if needed, enables foreign-key
    /// enforcement, and migrates the schema before returning.
    pub fn open(config: &Config) -> StorageResult<Self> {
        fs::create_dir_all(&config.data_dir).map_err(|source| StorageError::CreateDirectory {
            path: config.data_dir.clone(),
            source,
        })?;

        let path = config.store_path();
        let conn = Connection::open(&path)?;
        debug!("Opened store at {:?}", path);

        Self::init(conn)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        // Referential integrity is enforced, not advisory: the notification
        // cascade and the unknown-device rejection both depend on this.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::ensure_up_to_date(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        f(&conn)
    }

    /// Run `f` inside an explicit transaction
    ///
    /// Individual statements are already atomic; this is the primitive for
    /// callers that need a multi-statement sequence to commit or roll back
    /// together. The transaction commits when `f` returns `Ok` and rolls
    /// back when it returns `Err`.
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_open_creates_store_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let _handle = StorageHandle::open(&config).unwrap();
        assert!(config.store_path().exists());
    }

    #[test]
    fn test_open_creates_missing_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("nested").join("dir"),
        };

        let _handle = StorageHandle::open(&config).unwrap();
        assert!(config.store_path().exists());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        drop(StorageHandle::open(&config).unwrap());
        // Second open must not re-run any migration step
        let handle = StorageHandle::open(&config).unwrap();

        let version = handle
            .with_conn(|conn| schema::current_version(conn))
            .unwrap();
        assert_eq!(version, schema::CURRENT_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let handle = StorageHandle::open_in_memory().unwrap();

        let enabled: bool = handle
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let handle = StorageHandle::open_in_memory().unwrap();

        let result: StorageResult<()> = handle.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO config (key, value) VALUES ('k', 'v')",
                [],
            )?;
            Err(StorageError::Database(rusqlite::Error::QueryReturnedNoRows))
        });
        assert!(result.is_err());

        let count: i64 = handle
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(1) FROM config WHERE key = 'k'", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let handle = StorageHandle::open_in_memory().unwrap();

        handle
            .with_transaction(|tx| {
                tx.execute("INSERT INTO config (key, value) VALUES ('k', 'v')", [])?;
                Ok(())
            })
            .unwrap();

        let value: String = handle
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT value FROM config WHERE key = 'k'", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(value, "v");
    }

    #[test]
    fn test_handle_is_shareable_across_threads() {
        let handle = std::sync::Arc::new(StorageHandle::open_in_memory().unwrap());

        let mut threads = Vec::new();
        for i in 0..4 {
            let handle = handle.clone();
            threads.push(std::thread::spawn(move || {
                handle
                    .with_conn(|conn| {
                        conn.execute(
                            "INSERT INTO config (key, value) VALUES (?1, ?2) \
                             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                            [format!("key-{i}"), format!("value-{i}")],
                        )?;
                        Ok(())
                    })
                    .unwrap();
            }));
        }
        for t in threads {
            t.join().unwrap();
        }

        let count: i64 = handle
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(1) FROM config WHERE key LIKE 'key-%'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 4);
    }
}
