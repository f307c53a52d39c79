//! Transport backends.
//!
//! Implementations of [`Transport`](crate::transport::Transport).
//!
//! # Feature flags
//! - **`hid`** enables [`hid::HidTransport`] over `hidapi`. Off by default so
//!   the core builds and tests without the platform HID library.
//!
//! [`virtual_transport::VirtualTransport`] is always available.

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;
pub mod virtual_transport;

#[cfg(feature = "hid")]
pub use hid::HidTransport;
pub use virtual_transport::VirtualTransport;
