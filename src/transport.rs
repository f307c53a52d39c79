//! Transport abstraction over a HID handle.
//!
//! The manager never talks to a platform HID library directly. Instead it is
//! generic over a [`Transport`], which knows how to open a device by
//! vendor/product id, perform a **non-blocking** read, and close the handle.
//!
//! Implementations live in [`crate::backends`]:
//! - `HidTransport` (feature `hid`) wraps `hidapi`
//! - [`VirtualTransport`](crate::backends::virtual_transport::VirtualTransport)
//!   is an in-memory fake used by tests and demos

use thiserror::Error;

/// Failure reported by [`Transport::read`].
///
/// Any read error is treated as fatal for the current connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport read failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Contract the connection manager requires from a HID backend.
pub trait Transport {
    /// Open device handle owned by the manager while connected.
    type Handle;

    /// Try to open the first device matching `vendor_id:product_id`.
    ///
    /// Returns `None` when no such device is attached or it cannot be opened.
    /// Implementations must leave the handle in non-blocking mode.
    fn open(&mut self, vendor_id: u16, product_id: u16) -> Option<Self::Handle>;

    /// Read one input report into `buf` without blocking.
    ///
    /// `Ok(0)` means no report was pending.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Release a handle previously returned by [`open`](Self::open).
    fn close(&mut self, handle: Self::Handle);
}
