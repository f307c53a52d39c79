//! Notifications delivered to the consuming application.
//!
//! Each notification is an [`EventKind`] variant with a fixed payload. The
//! manager wraps it in a [`SpaceMouseEvent`] with a monotonic capture time
//! before handing it to the [`EventBus`](crate::eventbus::EventBus).
//!
//! ## Value conventions
//! - **Translation:** each component roughly in `[-5.0, 5.0]` (normalized input
//!   times translation sensitivity). `y`/`z` are already flipped.
//! - **Rotation:** degrees to apply this tick; full deflection at sensitivity
//!   `1.0` is `2.0`.
//! - **Buttons:** press edges only. There is no release notification.

use crate::conditioner::Vector3;
use serde::Serialize;
use std::time::Instant;

/// What happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    /// Connection state flipped.
    ConnectionChanged(bool),
    /// Input was enabled or disabled.
    EnabledChanged(bool),
    /// Either sensitivity changed; carries both current values.
    SensitivityChanged { translation: f32, rotation: f32 },
    /// The current translation and/or rotation changed (including a reset).
    InputChanged,
    /// New conditioned translation vector.
    TranslationInput(Vector3),
    /// New conditioned rotation vector.
    RotationInput(Vector3),
    LeftButtonPressed,
    RightButtonPressed,
    /// A device from the registry was opened; carries its model name.
    DeviceConnected(String),
    DeviceDisconnected,
    /// A read failed on the connected device.
    DeviceError(String),
}

impl EventKind {
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            EventKind::TranslationInput(_) | EventKind::RotationInput(_) | EventKind::InputChanged
        )
    }

    pub fn is_button(&self) -> bool {
        matches!(
            self,
            EventKind::LeftButtonPressed | EventKind::RightButtonPressed
        )
    }

    /// Connection, enable, sensitivity and error notifications.
    pub fn is_lifecycle(&self) -> bool {
        !self.is_motion() && !self.is_button()
    }
}

/// Timestamped notification.
#[derive(Clone, Debug)]
pub struct SpaceMouseEvent {
    /// Capture time (monotonic).
    pub at: Instant,
    pub kind: EventKind,
}

impl SpaceMouseEvent {
    pub fn new(at: Instant, kind: EventKind) -> Self {
        Self { at, kind }
    }
}
