//! Point-in-time view of the manager.
//!
//! [`ManagerSnapshot`] is an **owned**, read-only copy of everything the
//! consumer can query: connection and enable state, device name, the last
//! emitted vectors and both sensitivities. It is produced by
//! [`SpaceMouseManager::snapshot`](crate::manager::SpaceMouseManager::snapshot)
//! and is cheap to clone for fan-out (e.g. to a UI thread).
//!
//! A snapshot does **not** poll the device; it reflects the last tick.

use crate::conditioner::Vector3;
use crate::Result;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManagerSnapshot {
    pub connected: bool,
    pub enabled: bool,
    /// Model name of the connected device, if any.
    pub device_name: Option<String>,
    pub translation: Vector3,
    pub rotation: Vector3,
    pub translation_sensitivity: f32,
    pub rotation_sensitivity: f32,
    pub dead_zone_threshold: i16,
}

impl ManagerSnapshot {
    /// Single-line JSON, for logs and status endpoints.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
