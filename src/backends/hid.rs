//! `hidapi`-backed transport.

use crate::registry::{self, DeviceDescriptor};
use crate::transport::{Transport, TransportError};
use crate::Result;
use hidapi::{HidApi, HidDevice};
use tracing::{debug, warn};

/// Real HID transport. Owns the process-wide [`HidApi`] context.
pub struct HidTransport {
    api: HidApi,
}

impl HidTransport {
    /// Initialise the HID library.
    pub fn new() -> Result<Self> {
        let api = HidApi::new()?;
        Ok(Self { api })
    }

    /// Re-enumerate attached devices (hot-plug support before a rescan).
    pub fn refresh(&mut self) -> Result<()> {
        self.api.refresh_devices()?;
        Ok(())
    }

    /// Supported models currently visible on the bus, in enumeration order.
    pub fn supported_devices_present(&self) -> Vec<&'static DeviceDescriptor> {
        let mut found: Vec<&'static DeviceDescriptor> = Vec::new();
        for info in self.api.device_list() {
            if let Some(desc) = registry::lookup(info.vendor_id(), info.product_id()) {
                // One physical device usually exposes several HID interfaces.
                if !found.contains(&desc) {
                    found.push(desc);
                }
            }
        }
        found
    }
}

impl Transport for HidTransport {
    type Handle = HidDevice;

    fn open(&mut self, vendor_id: u16, product_id: u16) -> Option<HidDevice> {
        let device = self.api.open(vendor_id, product_id).ok()?;
        // The poller runs on the host's tick, so reads must never block.
        if let Err(e) = device.set_blocking_mode(false) {
            warn!(
                error = %e,
                "{vendor_id:04x}:{product_id:04x}: could not switch HID handle to non-blocking mode"
            );
        }
        debug!("{vendor_id:04x}:{product_id:04x}: HID device opened");
        Some(device)
    }

    fn read(
        &mut self,
        handle: &mut HidDevice,
        buf: &mut [u8],
    ) -> std::result::Result<usize, TransportError> {
        // A zero timeout keeps the tick non-blocking even if the mode switch
        // in `open` failed.
        handle
            .read_timeout(buf, 0)
            .map_err(|e| TransportError::new(e.to_string()))
    }

    fn close(&mut self, handle: HidDevice) {
        // hidapi closes the OS handle on drop.
        drop(handle);
    }
}
