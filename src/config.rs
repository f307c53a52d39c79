//! Startup configuration.
//!
//! All keys are optional; a missing key keeps its default.
//!
//! ```toml
//! translation_sensitivity = 1.5
//! rotation_sensitivity = 0.8
//! dead_zone_threshold = 50
//! non_linear = true
//! poll_interval_ms = 16
//! reconnect_delay_ms = 1000
//! enabled = true
//! ```
//!
//! Values go through the same clamping as the runtime setters, so a config
//! file can never put the manager into an out-of-range state. Nothing is ever
//! written back.

use crate::conditioner::{Calibration, DEFAULT_DEAD_ZONE};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Poll cadence: roughly 60 Hz.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;
/// Delay before the single reconnect attempt after a read failure.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpaceMouseConfig {
    pub translation_sensitivity: f32,
    pub rotation_sensitivity: f32,
    pub dead_zone_threshold: i16,
    pub non_linear: bool,
    pub poll_interval_ms: u64,
    pub reconnect_delay_ms: u64,
    /// Start with input enabled.
    pub enabled: bool,
}

impl Default for SpaceMouseConfig {
    fn default() -> Self {
        Self {
            translation_sensitivity: 1.0,
            rotation_sensitivity: 1.0,
            dead_zone_threshold: DEFAULT_DEAD_ZONE,
            non_linear: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            enabled: false,
        }
    }
}

impl SpaceMouseConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Conditioning parameters, clamped.
    pub fn calibration(&self) -> Calibration {
        let mut cal = Calibration::default();
        cal.set_dead_zone_threshold(self.dead_zone_threshold);
        cal.non_linear = self.non_linear;
        cal.set_translation_sensitivity(self.translation_sensitivity);
        cal.set_rotation_sensitivity(self.rotation_sensitivity);
        cal
    }

    /// Never shorter than 1 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Never shorter than 1 ms.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms.max(1))
    }
}
