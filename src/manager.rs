//! Connection lifecycle, polling and the consumer-facing control surface.
//!
//! [`SpaceMouseManager`] owns the transport handle and all mutable state. It
//! is single-threaded: the host calls [`run_pending`](SpaceMouseManager::run_pending)
//! from its loop and every timer callback runs there, so no locking is needed.
//!
//! Lifecycle:
//! - [`initialize_device`](SpaceMouseManager::initialize_device) scans the
//!   [registry](crate::registry::SUPPORTED_DEVICES) in table order and keeps
//!   the first device that opens.
//! - Polling runs only while the manager is both **connected** and
//!   **enabled**; the poll timer is started/stopped whenever either flips.
//! - A failed read disconnects immediately and schedules **one** reconnect
//!   attempt after the reconnect delay. If that attempt finds nothing, no
//!   further attempt is made until the consumer asks again.

use crate::conditioner::{Calibration, InputConditioner, Vector3};
use crate::config::SpaceMouseConfig;
use crate::event::{EventKind, SpaceMouseEvent};
use crate::eventbus::{EventBus, EventFilter, EventListener, ListenerId};
use crate::registry::{DeviceDescriptor, SUPPORTED_DEVICES};
use crate::report::{self, Report};
use crate::scheduler::{Clock, Scheduler, SystemClock, TimerHandle, TimerTask};
use crate::snapshot::ManagerSnapshot;
use crate::transport::{Transport, TransportError};
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Read buffer size; SpaceMouse reports are at most 64 bytes.
pub const REPORT_BUFFER_LEN: usize = 64;

pub struct SpaceMouseManager<T: Transport, C: Clock = SystemClock> {
    transport: T,
    handle: Option<T::Handle>,
    device: Option<&'static DeviceDescriptor>,
    enabled: bool,
    calibration: Calibration,
    conditioner: InputConditioner,
    bus: EventBus,
    scheduler: Scheduler,
    clock: C,
    poll_timer: Option<TimerHandle>,
    reconnect_timer: Option<TimerHandle>,
    poll_interval: Duration,
    reconnect_delay: Duration,
}

impl<T: Transport> SpaceMouseManager<T, SystemClock> {
    /// Manager with default settings. No device is opened yet.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &SpaceMouseConfig::default())
    }

    pub fn with_config(transport: T, config: &SpaceMouseConfig) -> Self {
        Self::with_clock(transport, config, SystemClock)
    }

    /// Drive timers in a blocking loop until `stop` is set.
    ///
    /// Sleeps until the next deadline between passes. Intended for standalone
    /// tools; hosts with their own loop should call
    /// [`run_pending`](Self::run_pending) instead.
    pub fn run_until(&mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            self.run_pending();
            let wait = match self.scheduler.next_deadline() {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.poll_interval,
            };
            std::thread::sleep(wait.min(self.poll_interval));
        }
    }
}

#[cfg(feature = "hid")]
impl SpaceMouseManager<crate::backends::hid::HidTransport, SystemClock> {
    /// Manager over the system HID stack.
    pub fn hid(config: &SpaceMouseConfig) -> Result<Self> {
        let transport = crate::backends::hid::HidTransport::new()?;
        Ok(Self::with_config(transport, config))
    }
}

impl<T: Transport, C: Clock> SpaceMouseManager<T, C> {
    pub fn with_clock(transport: T, config: &SpaceMouseConfig, clock: C) -> Self {
        Self {
            transport,
            handle: None,
            device: None,
            enabled: config.enabled,
            calibration: config.calibration(),
            conditioner: InputConditioner::new(),
            bus: EventBus::new(),
            scheduler: Scheduler::new(),
            clock,
            poll_timer: None,
            reconnect_timer: None,
            poll_interval: config.poll_interval(),
            reconnect_delay: config.reconnect_delay(),
        }
    }

    pub fn add_listener(
        &mut self,
        listener: impl EventListener + 'static,
        filter: EventFilter,
    ) -> ListenerId {
        self.bus.add_listener(listener, filter)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }

    /// Direct access to the bus (enable/disable listeners).
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Connect to the first supported device. `true` if connected afterwards.
    ///
    /// Returns `true` immediately when a device is already connected.
    pub fn initialize_device(&mut self) -> bool {
        if self.is_connected() {
            debug!("device already connected");
            return true;
        }
        self.scan().is_ok()
    }

    /// Try every registry entry in table order; the first that opens wins.
    pub fn scan(&mut self) -> Result<&'static DeviceDescriptor> {
        if let Some(device) = self.device {
            return Ok(device);
        }

        for desc in SUPPORTED_DEVICES {
            if let Some(handle) = self.transport.open(desc.vendor_id, desc.product_id) {
                self.handle = Some(handle);
                self.device = Some(desc);
                info!(device = %desc, "SpaceMouse connected");
                self.emit(EventKind::DeviceConnected(desc.name.to_string()));
                self.emit(EventKind::ConnectionChanged(true));
                self.sync_polling();
                return Ok(desc);
            }
        }

        debug!("no supported SpaceMouse device found");
        Err(Error::NoDeviceFound)
    }

    /// Stop polling and close the handle. No-op when already disconnected.
    ///
    /// A reconnect still pending from an earlier read failure is cancelled.
    pub fn disconnect_device(&mut self) {
        self.cancel_reconnect();
        self.close_device();
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Model name of the connected device.
    pub fn device_name(&self) -> Option<&'static str> {
        self.device.map(|d| d.name)
    }

    pub fn device(&self) -> Option<&'static DeviceDescriptor> {
        self.device
    }

    /// `true` while a deferred reconnect attempt is waiting to run.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_timer
            .is_some_and(|h| self.scheduler.is_scheduled(h))
    }

    /// Number of reconnect attempts currently scheduled (0 or 1).
    pub fn scheduled_reconnects(&self) -> usize {
        self.scheduler.count(TimerTask::Reconnect)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `true` while the poll timer is armed.
    pub fn is_polling(&self) -> bool {
        self.poll_timer.is_some()
    }

    /// Enable or disable input. Repeating the current value does nothing.
    ///
    /// Disabling stops the poll timer before its next tick and zeroes input.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;

        if !enabled && self.stop_polling() {
            self.reset_input();
            debug!("SpaceMouse input disabled, polling stopped");
        }
        self.sync_polling();

        self.emit(EventKind::EnabledChanged(enabled));
    }

    /// Run every timer that is due now. Returns how many fired.
    pub fn run_pending(&mut self) -> usize {
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(self.clock.now()) {
            fired += 1;
            match task {
                TimerTask::Poll => self.poll_device(),
                TimerTask::Reconnect => {
                    self.reconnect_timer = None;
                    debug!("running scheduled reconnect");
                    self.initialize_device();
                }
            }
        }
        fired
    }

    /// Earliest pending timer deadline, for hosts that sleep between passes.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// One poll tick: a single non-blocking read.
    ///
    /// Does nothing unless connected and enabled.
    pub fn poll_device(&mut self) {
        if !self.enabled {
            return;
        }
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        let mut buf = [0u8; REPORT_BUFFER_LEN];
        match self.transport.read(handle, &mut buf) {
            Ok(0) => {}
            Ok(n) => {
                let data = &buf[..n.min(buf.len())];
                #[cfg(feature = "debug-log")]
                trace!(bytes = ?data, "raw report");
                self.process_report(data);
            }
            Err(e) => self.handle_read_error(e),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn translation_sensitivity(&self) -> f32 {
        self.calibration.translation_sensitivity()
    }

    pub fn rotation_sensitivity(&self) -> f32 {
        self.calibration.rotation_sensitivity()
    }

    /// Clamped to `[0.1, 5.0]`. Notifies only on a real change.
    pub fn set_translation_sensitivity(&mut self, sensitivity: f32) {
        if self.calibration.set_translation_sensitivity(sensitivity) {
            debug!(
                value = self.calibration.translation_sensitivity(),
                "translation sensitivity"
            );
            self.emit_sensitivity();
        }
    }

    /// Clamped to `[0.1, 5.0]`. Notifies only on a real change.
    pub fn set_rotation_sensitivity(&mut self, sensitivity: f32) {
        if self.calibration.set_rotation_sensitivity(sensitivity) {
            debug!(
                value = self.calibration.rotation_sensitivity(),
                "rotation sensitivity"
            );
            self.emit_sensitivity();
        }
    }

    pub fn set_non_linear(&mut self, enabled: bool) {
        self.calibration.non_linear = enabled;
    }

    /// Reset the dead zone to the fixed calibrated threshold.
    pub fn calibrate_dead_zone(&mut self) {
        self.calibration.calibrate_dead_zone();
        info!(
            threshold = self.calibration.dead_zone_threshold(),
            "dead zone calibrated"
        );
    }

    pub fn current_translation(&self) -> Vector3 {
        self.conditioner.translation()
    }

    pub fn current_rotation(&self) -> Vector3 {
        self.conditioner.rotation()
    }

    /// Zero both vectors and notify. Connection and enable state are untouched.
    pub fn reset_input(&mut self) {
        self.conditioner.reset();
        self.emit(EventKind::InputChanged);
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            connected: self.is_connected(),
            enabled: self.enabled,
            device_name: self.device_name().map(str::to_string),
            translation: self.current_translation(),
            rotation: self.current_rotation(),
            translation_sensitivity: self.translation_sensitivity(),
            rotation_sensitivity: self.rotation_sensitivity(),
            dead_zone_threshold: self.calibration.dead_zone_threshold(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn process_report(&mut self, data: &[u8]) {
        match report::decode(data) {
            Some(Report::Motion(frame)) => {
                let update = self.conditioner.apply_motion(&frame, &self.calibration);
                if let Some(t) = update.translation {
                    self.emit(EventKind::TranslationInput(t));
                    self.emit(EventKind::InputChanged);
                }
                if let Some(r) = update.rotation {
                    self.emit(EventKind::RotationInput(r));
                    self.emit(EventKind::InputChanged);
                }
            }
            Some(Report::Buttons(frame)) => {
                let edges = self.conditioner.apply_buttons(frame);
                if edges.left_pressed {
                    debug!("left button pressed");
                    self.emit(EventKind::LeftButtonPressed);
                }
                if edges.right_pressed {
                    debug!("right button pressed");
                    self.emit(EventKind::RightButtonPressed);
                }
            }
            None => trace!(len = data.len(), "dropped unrecognised report"),
        }
    }

    fn handle_read_error(&mut self, error: TransportError) {
        warn!(%error, "SpaceMouse read failed, device may be disconnected");
        self.emit(EventKind::DeviceError(error.message.clone()));
        self.close_device();

        self.cancel_reconnect();
        let handle = self.scheduler.schedule_once(
            self.clock.now(),
            self.reconnect_delay,
            TimerTask::Reconnect,
        );
        self.reconnect_timer = Some(handle);
        debug!(delay_ms = self.reconnect_delay.as_millis() as u64, "reconnect scheduled");
    }

    /// Close without touching a pending reconnect.
    fn close_device(&mut self) {
        self.stop_polling();

        if let Some(handle) = self.handle.take() {
            self.transport.close(handle);
            let device = self.device.take();
            info!(device = ?device.map(|d| d.name), "SpaceMouse disconnected");
            self.emit(EventKind::DeviceDisconnected);
            self.emit(EventKind::ConnectionChanged(false));
        }
    }

    fn cancel_reconnect(&mut self) {
        if let Some(previous) = self.reconnect_timer.take() {
            self.scheduler.cancel(previous);
        }
    }

    /// Start or stop the poll timer so it runs exactly when connected and enabled.
    fn sync_polling(&mut self) {
        let should_poll = self.enabled && self.is_connected();
        if should_poll && self.poll_timer.is_none() {
            let handle = self.scheduler.schedule_repeating(
                self.clock.now(),
                self.poll_interval,
                TimerTask::Poll,
            );
            self.poll_timer = Some(handle);
            debug!("polling started");
        } else if !should_poll {
            self.stop_polling();
        }
    }

    /// Returns `true` if a poll timer was running.
    fn stop_polling(&mut self) -> bool {
        match self.poll_timer.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    fn emit_sensitivity(&mut self) {
        self.emit(EventKind::SensitivityChanged {
            translation: self.calibration.translation_sensitivity(),
            rotation: self.calibration.rotation_sensitivity(),
        });
    }

    fn emit(&mut self, kind: EventKind) {
        let event = SpaceMouseEvent::new(self.clock.now(), kind);
        self.bus.emit(&event);
    }
}

impl<T: Transport, C: Clock> Drop for SpaceMouseManager<T, C> {
    fn drop(&mut self) {
        self.disconnect_device();
    }
}
