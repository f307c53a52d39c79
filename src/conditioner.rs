//! Signal conditioning: raw counts in, translation/rotation vectors out.
//!
//! Every raw axis goes through the same pipeline:
//!
//! 1. **Dead zone**: `|raw| < threshold` becomes `0`
//! 2. **Normalize**: `raw / 32767`, clamped to `[-1.0, 1.0]`
//! 3. **Shape** (optional): `sign(f) * |f|^3`
//! 4. **Sensitivity**: multiply by the translation or rotation sensitivity
//! 5. **Remap**: translation is `(x, -y, -z)`; rotation is scaled to
//!    [`ROTATION_DEGREES_PER_FRAME`] at full deflection
//!
//! [`InputConditioner`] remembers the last emitted vectors and only reports a
//! new one when it differs, so a resting device does not flood consumers with
//! identical zero vectors.

use crate::report::{ButtonFrame, MotionFrame};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound for both sensitivities.
pub const MIN_SENSITIVITY: f32 = 0.1;
/// Upper bound for both sensitivities.
pub const MAX_SENSITIVITY: f32 = 5.0;
/// Sensitivity writes closer than this to the current value are ignored.
pub const SENSITIVITY_EPSILON: f32 = 0.01;

/// Dead zone used until [`Calibration::calibrate_dead_zone`] is called.
pub const DEFAULT_DEAD_ZONE: i16 = 50;
/// Dead zone applied by [`Calibration::calibrate_dead_zone`].
pub const CALIBRATED_DEAD_ZONE: i16 = 80;
/// Largest raw magnitude the device reports.
pub const MAX_RAW_MAGNITUDE: f32 = 32767.0;
/// Rotation, in degrees per tick, produced by full deflection at sensitivity 1.
pub const ROTATION_DEGREES_PER_FRAME: f32 = 2.0;

/// A plain 3-component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// Clamp a requested sensitivity into `[MIN_SENSITIVITY, MAX_SENSITIVITY]`.
///
/// NaN maps to the minimum.
pub fn clamp_sensitivity(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_SENSITIVITY;
    }
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

/// Tunable conditioning parameters, read on every tick.
///
/// Sensitivities and the raw full-scale value are private so they can only be
/// written through the validating setters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Calibration {
    dead_zone_threshold: i16,
    pub non_linear: bool,
    max_raw_magnitude: f32,
    translation_sensitivity: f32,
    rotation_sensitivity: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            dead_zone_threshold: DEFAULT_DEAD_ZONE,
            non_linear: true,
            max_raw_magnitude: MAX_RAW_MAGNITUDE,
            translation_sensitivity: 1.0,
            rotation_sensitivity: 1.0,
        }
    }
}

impl Calibration {
    pub fn dead_zone_threshold(&self) -> i16 {
        self.dead_zone_threshold
    }

    /// Negative thresholds are treated as zero (no dead zone).
    pub fn set_dead_zone_threshold(&mut self, threshold: i16) {
        self.dead_zone_threshold = threshold.max(0);
    }

    /// Reset the dead zone to the fixed [`CALIBRATED_DEAD_ZONE`].
    ///
    /// Nothing is measured; this is a fixed reset.
    pub fn calibrate_dead_zone(&mut self) {
        self.dead_zone_threshold = CALIBRATED_DEAD_ZONE;
    }

    pub fn max_raw_magnitude(&self) -> f32 {
        self.max_raw_magnitude
    }

    /// Full-scale raw count used by normalisation. Values that are not
    /// finite and positive are rejected; returns `false` in that case.
    pub fn set_max_raw_magnitude(&mut self, value: f32) -> bool {
        if !value.is_finite() || value <= 0.0 {
            return false;
        }
        self.max_raw_magnitude = value;
        true
    }

    pub fn translation_sensitivity(&self) -> f32 {
        self.translation_sensitivity
    }

    pub fn rotation_sensitivity(&self) -> f32 {
        self.rotation_sensitivity
    }

    /// Returns `true` if the stored value changed.
    pub fn set_translation_sensitivity(&mut self, value: f32) -> bool {
        update_sensitivity(&mut self.translation_sensitivity, value)
    }

    /// Returns `true` if the stored value changed.
    pub fn set_rotation_sensitivity(&mut self, value: f32) -> bool {
        update_sensitivity(&mut self.rotation_sensitivity, value)
    }

    /// Dead zone, normalize and shape one raw axis. Sensitivity is not applied.
    pub fn condition_axis(&self, raw: i16) -> f32 {
        let raw = apply_dead_zone(raw, self.dead_zone_threshold);
        let f = normalize(raw, self.max_raw_magnitude);
        if self.non_linear {
            shape_cubic(f)
        } else {
            f
        }
    }

    /// Translation vector for one motion frame, with `y`/`z` flipped.
    pub fn translation(&self, frame: &MotionFrame) -> Vector3 {
        let k = self.translation_sensitivity;
        let x = self.condition_axis(frame.tx) * k;
        let y = self.condition_axis(frame.ty) * k;
        let z = self.condition_axis(frame.tz) * k;
        Vector3::new(x, -y, -z)
    }

    /// Rotation vector for one motion frame, in degrees for this tick.
    pub fn rotation(&self, frame: &MotionFrame) -> Vector3 {
        let k = self.rotation_sensitivity;
        Vector3::new(
            self.condition_axis(frame.rx) * k,
            self.condition_axis(frame.ry) * k,
            self.condition_axis(frame.rz) * k,
        )
        .scale(ROTATION_DEGREES_PER_FRAME)
    }
}

fn update_sensitivity(slot: &mut f32, requested: f32) -> bool {
    let clamped = clamp_sensitivity(requested);
    if (*slot - clamped).abs() > SENSITIVITY_EPSILON {
        *slot = clamped;
        true
    } else {
        false
    }
}

/// Zero out readings whose magnitude is below `threshold`.
pub fn apply_dead_zone(raw: i16, threshold: i16) -> i16 {
    if i32::from(raw).abs() < i32::from(threshold) {
        0
    } else {
        raw
    }
}

/// Map a raw count onto `[-1.0, 1.0]`.
pub fn normalize(raw: i16, max_raw_magnitude: f32) -> f32 {
    (f32::from(raw) / max_raw_magnitude).clamp(-1.0, 1.0)
}

/// Cubic response curve. Odd, monotonic, fixes `0` and `±1`.
pub fn shape_cubic(input: f32) -> f32 {
    let magnitude = input.abs();
    input.signum() * magnitude * magnitude * magnitude
}

/// Previous button levels, for press-edge detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdgeState {
    pub left_was_down: bool,
    pub right_was_down: bool,
}

/// Press edges produced by one button frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub left_pressed: bool,
    pub right_pressed: bool,
}

impl ButtonEdgeState {
    /// Record a new frame and report which buttons went from up to down.
    ///
    /// Releases update the stored level but produce no edge.
    pub fn update(&mut self, frame: ButtonFrame) -> ButtonEdges {
        let edges = ButtonEdges {
            left_pressed: frame.left_down && !self.left_was_down,
            right_pressed: frame.right_down && !self.right_was_down,
        };
        self.left_was_down = frame.left_down;
        self.right_was_down = frame.right_down;
        edges
    }
}

/// Vectors that changed as a result of one motion frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionUpdate {
    pub translation: Option<Vector3>,
    pub rotation: Option<Vector3>,
}

impl MotionUpdate {
    pub fn is_empty(&self) -> bool {
        self.translation.is_none() && self.rotation.is_none()
    }
}

/// Stateful half of the pipeline: last emitted vectors and button levels.
#[derive(Clone, Debug, Default)]
pub struct InputConditioner {
    translation: Vector3,
    rotation: Vector3,
    buttons: ButtonEdgeState,
}

impl InputConditioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn button_state(&self) -> ButtonEdgeState {
        self.buttons
    }

    /// Condition a motion frame, keeping only vectors that differ from the last emitted ones.
    pub fn apply_motion(&mut self, frame: &MotionFrame, calibration: &Calibration) -> MotionUpdate {
        let mut update = MotionUpdate::default();

        let translation = calibration.translation(frame);
        if translation != self.translation {
            self.translation = translation;
            update.translation = Some(translation);
        }

        let rotation = calibration.rotation(frame);
        if rotation != self.rotation {
            self.rotation = rotation;
            update.rotation = Some(rotation);
        }

        update
    }

    pub fn apply_buttons(&mut self, frame: ButtonFrame) -> ButtonEdges {
        self.buttons.update(frame)
    }

    /// Zero both vectors. Button levels are left alone.
    pub fn reset(&mut self) {
        self.translation = Vector3::ZERO;
        self.rotation = Vector3::ZERO;
    }
}
