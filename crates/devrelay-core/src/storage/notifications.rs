//! Notification ledger
//!
//! CRUD over the `notifications` table, keyed by `(identifier, reference)`.
//! Persisting is an upsert: a repeat of the same pair replaces text, title,
//! and application in place while the cancel flag keeps whatever value it
//! had. Rows only exist for paired devices; the foreign key rejects anything
//! else and removes the rows when the device is unpaired.

use rusqlite::params;

use crate::models::Notification;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::handle::StorageHandle;

/// Accessor over the `notifications` table
pub struct NotificationLedger<'a> {
    handle: &'a StorageHandle,
}

impl<'a> NotificationLedger<'a> {
    pub(crate) fn new(handle: &'a StorageHandle) -> Self {
        Self { handle }
    }

    /// Insert or replace the notification for `(identifier, reference)`
    ///
    /// Replaces text, title, and application on conflict; the cancel flag is
    /// left untouched. Fails with [`StorageError::UnknownDevice`] if the
    /// identifier is not a paired device.
    pub fn persist(
        &self,
        identifier: &str,
        text: &str,
        title: &str,
        application: &str,
        reference: &str,
    ) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (identifier, text, title, application, reference) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(identifier, reference) DO UPDATE SET \
                 text = excluded.text, title = excluded.title, application = excluded.application",
                params![identifier, text, title, application, reference],
            )
            .map_err(|e| StorageError::from_constraint(e, identifier))?;
            Ok(())
        })
    }

    /// Remove the notification row entirely
    ///
    /// Silent no-op if the row is absent.
    pub fn dismiss(&self, identifier: &str, reference: &str) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "DELETE FROM notifications WHERE identifier = ?1 AND reference = ?2",
                params![identifier, reference],
            )?;
            Ok(())
        })
    }

    /// Mark the notification as cancelled, keeping the row
    ///
    /// Silent no-op if the row is absent.
    pub fn cancel(&self, identifier: &str, reference: &str) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "UPDATE notifications SET cancel = 1 WHERE identifier = ?1 AND reference = ?2",
                params![identifier, reference],
            )?;
            Ok(())
        })
    }

    /// List all notifications for a device
    ///
    /// Snapshot at call time; order is unspecified.
    pub fn list(&self, identifier: &str) -> StorageResult<Vec<Notification>> {
        self.handle.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cancel, reference, text, title, application \
                 FROM notifications WHERE identifier = ?1",
            )?;

            let notifications = stmt
                .query_map([identifier], |row| {
                    Ok(Notification {
                        identifier: identifier.to_string(),
                        cancel: row.get(0)?,
                        reference: row.get(1)?,
                        text: row.get(2)?,
                        title: row.get(3)?,
                        application: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notifications)
        })
    }
}
