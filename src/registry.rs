//! Supported device table.
//!
//! [`SUPPORTED_DEVICES`] lists every SpaceMouse model the manager will try to
//! open, keyed by USB vendor/product id. The table is scanned **in order**:
//! when several attached devices match, the earliest entry wins.
//!
//! Two vendor ids appear: `0x046d` (Logitech-era 3Dconnexion firmware) and
//! `0x256f` (3Dconnexion's own id on newer models). Some product names repeat
//! across vendors; that is expected.

use serde::Serialize;
use std::fmt;

/// Static description of one supported device model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceDescriptor {
    /// USB Vendor ID (VID).
    pub vendor_id: u16,
    /// USB Product ID (PID).
    pub product_id: u16,
    /// Human-readable model name reported to consumers on connect.
    pub name: &'static str,
}

impl DeviceDescriptor {
    pub const fn new(vendor_id: u16, product_id: u16, name: &'static str) -> Self {
        Self {
            vendor_id,
            product_id,
            name,
        }
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:04x}:{:04x})",
            self.name, self.vendor_id, self.product_id
        )
    }
}

/// Every device model the manager knows how to talk to, in scan order.
pub const SUPPORTED_DEVICES: &[DeviceDescriptor] = &[
    DeviceDescriptor::new(0x046d, 0xc626, "SpaceMouse Pro"),
    DeviceDescriptor::new(0x046d, 0xc627, "SpaceMouse Pro Wireless"),
    DeviceDescriptor::new(0x046d, 0xc62b, "SpaceMouse Pro Compact"),
    DeviceDescriptor::new(0x256f, 0xc62e, "SpaceMouse Wireless"),
    DeviceDescriptor::new(0x256f, 0xc62f, "SpaceMouse Pro Wireless (USB)"),
    DeviceDescriptor::new(0x046d, 0xc628, "SpaceMouse Enterprise"),
    DeviceDescriptor::new(0x046d, 0xc629, "SpaceMouse Compact"),
    DeviceDescriptor::new(0x256f, 0xc650, "SpaceMouse Enterprise"),
    DeviceDescriptor::new(0x256f, 0xc651, "SpaceMouse Pro Compact"),
    DeviceDescriptor::new(0x256f, 0xc652, "SpaceMouse Pro"),
];

/// Find the table entry for a vendor/product pair.
pub fn lookup(vendor_id: u16, product_id: u16) -> Option<&'static DeviceDescriptor> {
    SUPPORTED_DEVICES
        .iter()
        .find(|d| d.vendor_id == vendor_id && d.product_id == product_id)
}
