//! Versioned schema migrations
//!
//! The store records the index of the last migration step applied to it,
//! inside the same `config` table the migrations create. On every open the
//! engine replays the steps the store has not seen yet, then persists the
//! new index. A store created at any prior version is brought up to the
//! current structure exactly once.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::settings;

/// Reserved config key holding the applied migration step index
pub const SCHEMA_KEY: &str = "schema";

/// Append-only migration steps
///
/// Each step is an ordered batch of structural statements taking the store
/// from the state after the previous step. Published steps never change;
/// new structural work is appended as a new step, so a store migrated by an
/// older build resumes deterministically under a newer one.
const STEPS: &[&[&str]] = &[
    // Step 0: initial layout
    &[
        "CREATE TABLE config (key TEXT PRIMARY KEY, value TEXT)",
        "CREATE TABLE trusted_devices (identifier TEXT PRIMARY KEY, certificate TEXT, \
         name TEXT, type TEXT)",
        "CREATE TABLE notifications (reference TEXT, identifier TEXT, text TEXT, \
         title TEXT, application TEXT, PRIMARY KEY (identifier, reference), \
         FOREIGN KEY (identifier) REFERENCES trusted_devices (identifier) ON DELETE CASCADE)",
        "CREATE INDEX notification_identifier ON notifications (identifier)",
    ],
    // Step 1: remote-side cancellation flag
    &["ALTER TABLE notifications ADD COLUMN cancel INTEGER DEFAULT 0"],
];

/// Index of the newest migration step
pub const CURRENT_VERSION: i64 = STEPS.len() as i64 - 1;

/// Bring the store up to the current schema version
///
/// Idempotent: safe to run on every open, including on an already-current
/// store (no statements execute) and on a brand-new empty one (full
/// initialization). Any statement failure aborts the pass with
/// [`StorageError::Migration`] before the version marker advances, so the
/// failing step re-runs in full on the next open.
pub fn ensure_up_to_date(conn: &Connection) -> StorageResult<()> {
    let starting_version = current_version(conn)?;
    let mut version = starting_version;

    for (index, statements) in STEPS.iter().enumerate() {
        if index as i64 > version {
            debug!("Applying schema migration step {}", index);

            for statement in statements.iter() {
                conn.execute(statement, [])
                    .map_err(|source| StorageError::Migration {
                        step: index,
                        source,
                    })?;
            }
            version = index as i64;
        }
    }

    if version != starting_version {
        info!(
            "Migrated store schema from version {} to {}",
            starting_version, version
        );
    }

    // Persisted once after the loop, never per step: the whole pass is a
    // single commit point as far as the marker is concerned.
    settings::save_value(conn, SCHEMA_KEY, &version.to_string())?;
    Ok(())
}

/// Read the persisted migration step index
///
/// An absent `config` table, an absent key, and an unparseable value all
/// mean the same thing: a store the engine has never touched, version -1.
pub fn current_version(conn: &Connection) -> StorageResult<i64> {
    Ok(settings::load_value(conn, SCHEMA_KEY)?
        .and_then(|value| value.parse().ok())
        .unwrap_or(-1))
}
