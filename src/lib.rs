//! Device manager and signal conditioning for 6DOF SpaceMouse-class devices.
//!
//! Turns raw HID reports into a clean, rate-limited stream of translation and
//! rotation vectors plus button press events:
//!
//! ```text
//! Transport ─► poll tick ─► report::decode ─► conditioner ─► EventBus
//! ```
//!
//! The hardware is reached through a [`Transport`]; the `hid` feature supplies
//! one backed by `hidapi`, and [`backends::VirtualTransport`] runs everything
//! in memory.
//!
//! ```no_run
//! use spacemouse::backends::VirtualTransport;
//! use spacemouse::{EventFilter, SpaceMouseManager, TracingListener};
//!
//! let mut mgr = SpaceMouseManager::new(VirtualTransport::new());
//! mgr.add_listener(TracingListener::new(), EventFilter::All);
//! if mgr.initialize_device() {
//!     mgr.set_enabled(true);
//! }
//! loop {
//!     mgr.run_pending();
//!     std::thread::sleep(std::time::Duration::from_millis(4));
//! }
//! ```

pub mod backends;
pub mod conditioner;
pub mod config;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod logger;
pub mod manager;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod snapshot;
pub mod transport;

pub use conditioner::{Calibration, Vector3};
pub use config::SpaceMouseConfig;
pub use error::{Error, Result};
pub use event::{EventKind, SpaceMouseEvent};
pub use eventbus::{EventBus, EventFilter, EventListener, ListenerId};
pub use filtered_listener::FilteredListener;
pub use logger::TracingListener;
pub use manager::SpaceMouseManager;
pub use registry::{DeviceDescriptor, SUPPORTED_DEVICES};
pub use snapshot::ManagerSnapshot;
pub use transport::{Transport, TransportError};
