use spacemouse::backends::virtual_transport::VirtualHandle;
use spacemouse::backends::VirtualTransport;
use spacemouse::conditioner::{CALIBRATED_DEAD_ZONE, MAX_SENSITIVITY, MIN_SENSITIVITY};
use spacemouse::scheduler::ManualClock;
use spacemouse::{
    EventFilter, EventKind, SpaceMouseConfig, SpaceMouseEvent, SpaceMouseManager, Transport,
    TransportError, Vector3, SUPPORTED_DEVICES,
};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(16);
const RECONNECT: Duration = Duration::from_millis(1000);

type Manager = SpaceMouseManager<VirtualTransport, ManualClock>;

struct Rig {
    mgr: Manager,
    clock: ManualClock,
    events: Receiver<SpaceMouseEvent>,
}

impl Rig {
    fn new(attached: &[(u16, u16)]) -> Self {
        Self::with_config(attached, SpaceMouseConfig::default())
    }

    fn with_config(attached: &[(u16, u16)], config: SpaceMouseConfig) -> Self {
        let clock = ManualClock::new();
        let mut transport = VirtualTransport::new();
        for &(vid, pid) in attached {
            transport.attach(vid, pid);
        }
        let mut mgr = SpaceMouseManager::with_clock(transport, &config, clock.clone());
        let (tx, events) = mpsc::channel::<SpaceMouseEvent>();
        mgr.add_listener(tx, EventFilter::All);
        Self { mgr, clock, events }
    }

    /// Connected and enabled, with the setup events drained.
    fn running() -> Self {
        let mut rig = Self::new(&[(0x046d, 0xc626)]);
        assert!(rig.mgr.initialize_device());
        rig.mgr.set_enabled(true);
        rig.drain();
        rig
    }

    fn tick(&mut self) -> usize {
        self.clock.advance(TICK);
        self.mgr.run_pending()
    }

    fn drain(&self) -> Vec<EventKind> {
        self.events.try_iter().map(|e| e.kind).collect()
    }

    fn feed(&mut self, report: Vec<u8>) {
        self.mgr.transport_mut().feed(report);
    }
}

fn motion(values: [i16; 6]) -> Vec<u8> {
    let mut out = vec![0x01];
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn buttons(mask: u8) -> Vec<u8> {
    vec![0x03, mask]
}

fn translations(events: &[EventKind]) -> Vec<Vector3> {
    events
        .iter()
        .filter_map(|k| match k {
            EventKind::TranslationInput(v) => Some(*v),
            _ => None,
        })
        .collect()
}

fn count(events: &[EventKind], wanted: &EventKind) -> usize {
    events.iter().filter(|k| *k == wanted).count()
}

#[test]
fn scan_tries_table_in_order_and_takes_first_match() {
    // Both the 3rd and 8th entries are attached; the 3rd must win.
    let third = SUPPORTED_DEVICES[2];
    let eighth = SUPPORTED_DEVICES[7];
    let mut rig = Rig::new(&[
        (eighth.vendor_id, eighth.product_id),
        (third.vendor_id, third.product_id),
    ]);

    let chosen = rig.mgr.scan().expect("device found");
    assert_eq!(*chosen, third);
    assert_eq!(rig.mgr.device_name(), Some(third.name));

    let expected: Vec<(u16, u16)> = SUPPORTED_DEVICES[..3]
        .iter()
        .map(|d| (d.vendor_id, d.product_id))
        .collect();
    assert_eq!(rig.mgr.transport().open_attempts(), expected.as_slice());
}

#[test]
fn scan_without_devices_reports_not_found() {
    let mut rig = Rig::new(&[]);
    assert!(matches!(
        rig.mgr.scan(),
        Err(spacemouse::Error::NoDeviceFound)
    ));
    assert!(!rig.mgr.initialize_device());
    assert!(!rig.mgr.is_connected());
    assert_eq!(rig.mgr.device_name(), None);
    assert_eq!(
        rig.mgr.transport().open_attempts().len(),
        2 * SUPPORTED_DEVICES.len()
    );
    assert!(rig.drain().is_empty());
}

#[test]
fn disconnect_is_idempotent() {
    let mut rig = Rig::running();
    rig.mgr.disconnect_device();
    rig.mgr.disconnect_device();

    assert_eq!(
        rig.drain(),
        vec![
            EventKind::DeviceDisconnected,
            EventKind::ConnectionChanged(false),
        ]
    );
    assert_eq!(rig.mgr.transport().closed_count(), 1);
    assert!(!rig.mgr.is_polling());
}

#[test]
fn polling_requires_connected_and_enabled() {
    let mut rig = Rig::new(&[(0x256f, 0xc652)]);
    rig.feed(buttons(0x01));

    rig.mgr.set_enabled(true);
    assert_eq!(rig.tick(), 0, "enabled but disconnected must not tick");

    rig.mgr.initialize_device();
    assert!(rig.mgr.is_polling());
    assert_eq!(rig.tick(), 1);
    assert_eq!(rig.mgr.transport().pending_reads(), 0);

    rig.mgr.set_enabled(false);
    rig.feed(buttons(0x00));
    assert_eq!(rig.tick(), 0, "disabled must not tick");
    assert_eq!(rig.mgr.transport().pending_reads(), 1);
}

#[test]
fn repeated_enable_state_is_noop() {
    let mut rig = Rig::new(&[]);
    rig.mgr.set_enabled(true);
    rig.mgr.set_enabled(true);
    rig.mgr.set_enabled(false);
    rig.mgr.set_enabled(false);
    assert_eq!(
        rig.drain(),
        vec![
            EventKind::EnabledChanged(true),
            EventKind::EnabledChanged(false),
        ]
    );
}

#[test]
fn one_read_per_tick() {
    let mut rig = Rig::running();
    rig.feed(buttons(0x01));
    rig.feed(buttons(0x00));

    rig.tick();
    assert_eq!(rig.mgr.transport().pending_reads(), 1);
    rig.tick();
    assert_eq!(rig.mgr.transport().pending_reads(), 0);
}

#[test]
fn half_push_yields_cubic_translation() {
    let mut rig = Rig::running();
    rig.feed(motion([16000, 0, 0, 0, 0, 0]));
    rig.tick();

    let events = rig.drain();
    let t = translations(&events);
    assert_eq!(t.len(), 1);
    assert!((t[0].x - 0.1164).abs() < 1e-3, "x = {}", t[0].x);
    assert_eq!(t[0].y, 0.0);
    assert_eq!(t[0].z, 0.0);
    assert_eq!(rig.mgr.current_translation(), t[0]);
    assert_eq!(count(&events, &EventKind::InputChanged), 1);
}

#[test]
fn input_inside_dead_zone_is_exactly_zero() {
    let mut rig = Rig::running();
    rig.feed(motion([30, -49, 49, 10, -10, 0]));
    rig.tick();

    assert_eq!(rig.mgr.current_translation().x, 0.0);
    assert_eq!(rig.mgr.current_translation(), Vector3::ZERO);
    assert_eq!(rig.mgr.current_rotation(), Vector3::ZERO);
    assert!(rig.drain().is_empty(), "zero vector is not re-emitted");
}

#[test]
fn identical_frames_are_emitted_once() {
    let mut rig = Rig::running();
    let push = motion([0, 0, 0, 0, 32767, 0]);
    for _ in 0..5 {
        rig.feed(push.clone());
        rig.tick();
    }

    let events = rig.drain();
    let rotations: Vec<_> = events
        .iter()
        .filter(|k| matches!(k, EventKind::RotationInput(_)))
        .collect();
    assert_eq!(rotations.len(), 1);
    assert_eq!(
        rotations[0],
        &EventKind::RotationInput(Vector3::new(0.0, 2.0, 0.0))
    );
}

#[test]
fn translation_axes_are_remapped() {
    let mut rig = Rig::with_config(
        &[(0x046d, 0xc626)],
        SpaceMouseConfig {
            non_linear: false,
            enabled: true,
            ..Default::default()
        },
    );
    rig.mgr.initialize_device();
    rig.feed(motion([32767, 32767, -32767, 0, 0, 0]));
    rig.tick();

    assert_eq!(rig.mgr.current_translation(), Vector3::new(1.0, -1.0, 1.0));
}

#[test]
fn held_button_fires_once() {
    let mut rig = Rig::running();
    rig.feed(buttons(0x01));
    rig.feed(buttons(0x01));
    rig.tick();
    rig.tick();

    assert_eq!(rig.drain(), vec![EventKind::LeftButtonPressed]);
}

#[test]
fn press_release_press_fires_twice() {
    let mut rig = Rig::running();
    for mask in [0x02, 0x00, 0x02] {
        rig.feed(buttons(mask));
        rig.tick();
    }

    let events = rig.drain();
    assert_eq!(count(&events, &EventKind::RightButtonPressed), 2);
    assert_eq!(count(&events, &EventKind::LeftButtonPressed), 0);
}

#[test]
fn both_buttons_in_one_report() {
    let mut rig = Rig::running();
    rig.feed(buttons(0x03));
    rig.tick();

    assert_eq!(
        rig.drain(),
        vec![EventKind::LeftButtonPressed, EventKind::RightButtonPressed]
    );
}

#[test]
fn malformed_reports_are_dropped_silently() {
    let mut rig = Rig::running();
    rig.feed(vec![0x01, 0x10, 0x20]);
    rig.feed(vec![0x03]);
    rig.feed(vec![0x7F, 0x01, 0x02]);
    for _ in 0..3 {
        rig.tick();
    }

    assert!(rig.drain().is_empty());
    assert!(rig.mgr.is_connected());
}

#[test]
fn read_error_disconnects_and_schedules_one_retry() {
    let mut rig = Rig::running();
    rig.mgr.transport_mut().fail_next_read("device unplugged");
    rig.tick();

    assert!(!rig.mgr.is_connected());
    assert!(!rig.mgr.is_polling());
    assert!(rig.mgr.reconnect_pending());
    assert_eq!(rig.mgr.scheduled_reconnects(), 1);

    let events = rig.drain();
    assert_eq!(
        events,
        vec![
            EventKind::DeviceError("device unplugged".into()),
            EventKind::DeviceDisconnected,
            EventKind::ConnectionChanged(false),
        ]
    );
}

#[test]
fn scheduled_retry_reconnects_without_caller_action() {
    let mut rig = Rig::running();
    rig.mgr.transport_mut().fail_next_read("read failed");
    rig.tick();
    rig.drain();

    rig.clock.advance(RECONNECT - TICK);
    assert_eq!(rig.mgr.run_pending(), 0);
    rig.clock.advance(TICK);
    assert_eq!(rig.mgr.run_pending(), 1);

    assert!(rig.mgr.is_connected());
    assert!(rig.mgr.is_enabled());
    assert!(rig.mgr.is_polling(), "polling resumes because input stayed enabled");
    assert!(!rig.mgr.reconnect_pending());
    assert_eq!(
        rig.drain(),
        vec![
            EventKind::DeviceConnected("SpaceMouse Pro".into()),
            EventKind::ConnectionChanged(true),
        ]
    );
}

#[test]
fn failed_retry_is_not_repeated() {
    let mut rig = Rig::running();
    rig.mgr.transport_mut().fail_next_read("read failed");
    rig.mgr.transport_mut().detach(0x046d, 0xc626);
    rig.tick();

    rig.clock.advance(RECONNECT);
    rig.mgr.run_pending();
    assert!(!rig.mgr.is_connected());
    assert_eq!(rig.mgr.scheduled_reconnects(), 0);

    rig.mgr.transport_mut().clear_open_attempts();
    rig.clock.advance(RECONNECT * 10);
    assert_eq!(rig.mgr.run_pending(), 0);
    assert!(rig.mgr.transport().open_attempts().is_empty());

    // The consumer can still retry by hand.
    rig.mgr.transport_mut().attach(0x046d, 0xc626);
    assert!(rig.mgr.initialize_device());
}

#[test]
fn consumer_disconnect_cancels_pending_retry() {
    let mut rig = Rig::running();
    rig.mgr.transport_mut().fail_next_read("read failed");
    rig.tick();
    assert!(rig.mgr.reconnect_pending());

    rig.mgr.disconnect_device();
    assert!(!rig.mgr.reconnect_pending());
    assert_eq!(rig.mgr.scheduled_reconnects(), 0);

    rig.mgr.transport_mut().clear_open_attempts();
    rig.clock.advance(RECONNECT * 2);
    assert_eq!(rig.mgr.run_pending(), 0);
    assert!(!rig.mgr.is_connected());
    assert!(rig.mgr.transport().open_attempts().is_empty());
}

#[test]
fn sensitivity_is_clamped_and_deduplicated() {
    let mut rig = Rig::new(&[]);

    rig.mgr.set_translation_sensitivity(-1.0);
    assert_eq!(rig.mgr.translation_sensitivity(), MIN_SENSITIVITY);
    rig.mgr.set_translation_sensitivity(10.0);
    assert_eq!(rig.mgr.translation_sensitivity(), MAX_SENSITIVITY);
    rig.mgr.set_translation_sensitivity(10.0);

    rig.mgr.set_rotation_sensitivity(1.5);
    assert_eq!(rig.mgr.rotation_sensitivity(), 1.5);
    rig.mgr.set_rotation_sensitivity(1.505);

    assert_eq!(
        rig.drain(),
        vec![
            EventKind::SensitivityChanged {
                translation: MIN_SENSITIVITY,
                rotation: 1.0,
            },
            EventKind::SensitivityChanged {
                translation: MAX_SENSITIVITY,
                rotation: 1.0,
            },
            EventKind::SensitivityChanged {
                translation: MAX_SENSITIVITY,
                rotation: 1.5,
            },
        ]
    );
}

#[test]
fn sensitivity_scales_output() {
    let mut rig = Rig::running();
    rig.mgr.set_translation_sensitivity(2.0);
    rig.feed(motion([32767, 0, 0, 0, 0, 0]));
    rig.tick();
    assert_eq!(rig.mgr.current_translation().x, 2.0);
}

#[test]
fn reset_input_zeroes_and_notifies() {
    let mut rig = Rig::running();
    rig.feed(motion([20000, 20000, 0, 0, 0, 20000]));
    rig.tick();
    rig.drain();

    rig.mgr.reset_input();
    assert_eq!(rig.mgr.current_translation(), Vector3::ZERO);
    assert_eq!(rig.mgr.current_rotation(), Vector3::ZERO);
    assert_eq!(rig.drain(), vec![EventKind::InputChanged]);
    assert!(rig.mgr.is_connected());
    assert!(rig.mgr.is_enabled());
}

#[test]
fn calibrate_dead_zone_widens_threshold() {
    let mut rig = Rig::running();
    rig.mgr.calibrate_dead_zone();
    assert_eq!(
        rig.mgr.calibration().dead_zone_threshold(),
        CALIBRATED_DEAD_ZONE
    );

    rig.feed(motion([70, 0, 0, 0, 0, 0]));
    rig.tick();
    assert_eq!(rig.mgr.current_translation(), Vector3::ZERO);
}

#[test]
fn snapshot_reflects_state() {
    let mut rig = Rig::running();
    rig.feed(motion([0, 0, 0, 32767, 0, 0]));
    rig.tick();

    let snap = rig.mgr.snapshot();
    assert!(snap.connected);
    assert!(snap.enabled);
    assert_eq!(snap.device_name.as_deref(), Some("SpaceMouse Pro"));
    assert_eq!(snap.rotation, Vector3::new(2.0, 0.0, 0.0));
    assert!(snap.to_json().expect("json").contains("\"connected\":true"));
}

#[test]
fn listener_filters_apply_through_manager() {
    let mut rig = Rig::running();
    let (tx, buttons_only) = mpsc::channel::<SpaceMouseEvent>();
    rig.mgr.add_listener(tx, EventFilter::ButtonsOnly);

    rig.feed(motion([20000, 0, 0, 0, 0, 0]));
    rig.feed(buttons(0x01));
    rig.tick();
    rig.tick();

    let got: Vec<_> = buttons_only.try_iter().map(|e| e.kind).collect();
    assert_eq!(got, vec![EventKind::LeftButtonPressed]);
}

/// Counts closes in a cell the test keeps after the manager is gone.
struct CloseCounting {
    inner: VirtualTransport,
    closed: Rc<Cell<usize>>,
}

impl Transport for CloseCounting {
    type Handle = VirtualHandle;

    fn open(&mut self, vendor_id: u16, product_id: u16) -> Option<VirtualHandle> {
        self.inner.open(vendor_id, product_id)
    }

    fn read(&mut self, handle: &mut VirtualHandle, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.inner.read(handle, buf)
    }

    fn close(&mut self, handle: VirtualHandle) {
        self.closed.set(self.closed.get() + 1);
        self.inner.close(handle);
    }
}

#[test]
fn dropping_manager_disconnects_device() {
    let closed = Rc::new(Cell::new(0));
    let mut inner = VirtualTransport::new();
    inner.attach(0x046d, 0xc626);
    let transport = CloseCounting {
        inner,
        closed: Rc::clone(&closed),
    };

    let mut mgr = SpaceMouseManager::with_clock(
        transport,
        &SpaceMouseConfig::default(),
        ManualClock::new(),
    );
    let (tx, events) = mpsc::channel::<SpaceMouseEvent>();
    mgr.add_listener(tx, EventFilter::All);
    assert!(mgr.initialize_device());
    mgr.set_enabled(true);
    let _ = events.try_iter().count();

    drop(mgr);

    let got: Vec<_> = events.try_iter().map(|e| e.kind).collect();
    assert_eq!(
        got,
        vec![
            EventKind::DeviceDisconnected,
            EventKind::ConnectionChanged(false),
        ]
    );
    assert_eq!(closed.get(), 1);
}

#[test]
fn dropping_disconnected_manager_is_silent() {
    let closed = Rc::new(Cell::new(0));
    let transport = CloseCounting {
        inner: VirtualTransport::new(),
        closed: Rc::clone(&closed),
    };
    let mut mgr = SpaceMouseManager::with_clock(
        transport,
        &SpaceMouseConfig::default(),
        ManualClock::new(),
    );
    let (tx, events) = mpsc::channel::<SpaceMouseEvent>();
    mgr.add_listener(tx, EventFilter::All);

    drop(mgr);

    assert_eq!(events.try_iter().count(), 0);
    assert_eq!(closed.get(), 0);
}
