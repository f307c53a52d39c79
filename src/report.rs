//! SpaceMouse input report decoding.
//!
//! Reports arrive as `[report_id][payload...]`. Two report ids carry input:
//!
//! | id     | min length (incl. id) | payload                                       |
//! |--------|-----------------------|-----------------------------------------------|
//! | `0x01` | 13                    | `tx ty tz rx ry rz`, each `i16` little-endian |
//! | `0x03` | 2                     | button bitmask: bit 0 left, bit 1 right       |
//!
//! Anything else (unknown id, short buffer) decodes to `None`. Short reports
//! are routine on partial reads, so they are dropped quietly rather than
//! surfaced as errors.

/// Report id of the 6DOF motion report.
pub const MOTION_REPORT_ID: u8 = 0x01;
/// Report id of the button report.
pub const BUTTON_REPORT_ID: u8 = 0x03;

/// Payload bytes needed for a motion report (six `i16` values).
pub const MOTION_PAYLOAD_LEN: usize = 12;
/// Payload bytes needed for a button report.
pub const BUTTON_PAYLOAD_LEN: usize = 1;

const LEFT_BUTTON_MASK: u8 = 0x01;
const RIGHT_BUTTON_MASK: u8 = 0x02;

/// Raw translation and rotation counts, as sent by the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionFrame {
    pub tx: i16,
    pub ty: i16,
    pub tz: i16,
    pub rx: i16,
    pub ry: i16,
    pub rz: i16,
}

/// Button state carried by one button report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonFrame {
    pub left_down: bool,
    pub right_down: bool,
}

/// A decoded report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    Motion(MotionFrame),
    Buttons(ButtonFrame),
}

/// Split `[report_id][payload...]`. Empty input yields id 0 and no payload.
#[inline]
pub fn split_report(data: &[u8]) -> (u8, &[u8]) {
    match data.split_first() {
        Some((&id, payload)) => (id, payload),
        None => (0, &[]),
    }
}

/// Decode a full report buffer (report id included).
pub fn decode(data: &[u8]) -> Option<Report> {
    let (report_id, payload) = split_report(data);
    decode_payload(report_id, payload)
}

/// Decode a payload whose report id has already been stripped.
pub fn decode_payload(report_id: u8, payload: &[u8]) -> Option<Report> {
    match report_id {
        MOTION_REPORT_ID => decode_motion(payload).map(Report::Motion),
        BUTTON_REPORT_ID => decode_buttons(payload).map(Report::Buttons),
        _ => None,
    }
}

fn decode_motion(payload: &[u8]) -> Option<MotionFrame> {
    if payload.len() < MOTION_PAYLOAD_LEN {
        return None;
    }
    let axis = |i: usize| i16::from_le_bytes([payload[2 * i], payload[2 * i + 1]]);
    Some(MotionFrame {
        tx: axis(0),
        ty: axis(1),
        tz: axis(2),
        rx: axis(3),
        ry: axis(4),
        rz: axis(5),
    })
}

fn decode_buttons(payload: &[u8]) -> Option<ButtonFrame> {
    let &mask = payload.first()?;
    Some(ButtonFrame {
        left_down: mask & LEFT_BUTTON_MASK != 0,
        right_down: mask & RIGHT_BUTTON_MASK != 0,
    })
}
