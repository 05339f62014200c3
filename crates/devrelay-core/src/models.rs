//! Data models for DevRelay
//!
//! Defines the records held in the store: trusted devices and the
//! notifications relayed on their behalf.

use serde::{Deserialize, Serialize};

/// A remote device the user has paired with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrustedDevice {
    /// Globally unique device identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Device category ("android", "desktop", ...)
    pub device_type: String,
}

/// A notification relayed from a trusted device
///
/// Identified by `(identifier, reference)`; the reference is an opaque token
/// chosen by the sending device to distinguish its own notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Identifier of the owning device
    pub identifier: String,
    /// Caller-supplied token, unique per device
    pub reference: String,
    /// Notification body
    pub text: String,
    /// Notification title
    pub title: String,
    /// Name of the application that raised the notification
    pub application: String,
    /// Whether the notification has been cancelled on the remote side
    pub cancel: bool,
}
