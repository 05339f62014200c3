//! Trusted device registry
//!
//! CRUD over the `trusted_devices` table. Identifier and certificate are
//! immutable once paired; only name and type can change. Unpairing cascades
//! to the device's notifications through the foreign key declared in the
//! schema.

use rusqlite::params;

use crate::models::TrustedDevice;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::handle::StorageHandle;

/// Accessor over the `trusted_devices` table
pub struct DeviceRegistry<'a> {
    handle: &'a StorageHandle,
}

impl<'a> DeviceRegistry<'a> {
    pub(crate) fn new(handle: &'a StorageHandle) -> Self {
        Self { handle }
    }

    /// Check whether a device identifier is paired
    pub fn is_trusted(&self, identifier: &str) -> StorageResult<bool> {
        self.handle.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(1) FROM trusted_devices WHERE identifier = ?1",
                [identifier],
                |row| row.get(0),
            )?;
            Ok(count == 1)
        })
    }

    /// List all paired devices
    ///
    /// Snapshot at call time; order is unspecified.
    pub fn list(&self) -> StorageResult<Vec<TrustedDevice>> {
        self.handle.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT identifier, name, type FROM trusted_devices")?;

            let devices = stmt
                .query_map([], |row| {
                    Ok(TrustedDevice {
                        identifier: row.get(0)?,
                        name: row.get(1)?,
                        device_type: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(devices)
        })
    }

    /// Pair a new device
    ///
    /// Fails with [`StorageError::DuplicateDevice`] if the identifier is
    /// already paired; the existing record is left untouched.
    pub fn pair(
        &self,
        identifier: &str,
        certificate: &str,
        name: &str,
        device_type: &str,
    ) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "INSERT INTO trusted_devices (identifier, certificate, name, type) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![identifier, certificate, name, device_type],
            )
            .map_err(|e| StorageError::from_constraint(e, identifier))?;
            Ok(())
        })
    }

    /// Update the display name and type of a paired device
    ///
    /// Silent no-op if the identifier is not paired.
    pub fn update(&self, identifier: &str, name: &str, device_type: &str) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "UPDATE trusted_devices SET name = ?1, type = ?2 WHERE identifier = ?3",
                params![name, device_type, identifier],
            )?;
            Ok(())
        })
    }

    /// Remove a paired device and, by cascade, all its notifications
    ///
    /// Silent no-op if the identifier is not paired.
    pub fn unpair(&self, identifier: &str) -> StorageResult<()> {
        self.handle.with_conn(|conn| {
            conn.execute(
                "DELETE FROM trusted_devices WHERE identifier = ?1",
                [identifier],
            )?;
            Ok(())
        })
    }
}
