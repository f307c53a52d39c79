//! Drive the full pipeline against a scripted in-memory device.

use spacemouse::backends::VirtualTransport;
use spacemouse::scheduler::ManualClock;
use spacemouse::{EventFilter, SpaceMouseConfig, SpaceMouseManager, TracingListener};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn motion(values: [i16; 6]) -> Vec<u8> {
    let mut out = vec![0x01];
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("spacemouse=trace"))
        .init();

    let clock = ManualClock::new();
    let mut transport = VirtualTransport::new();
    transport.attach(0x256f, 0xc652);

    let config = SpaceMouseConfig {
        enabled: true,
        ..Default::default()
    };
    let mut mgr = SpaceMouseManager::with_clock(transport, &config, clock.clone());
    mgr.add_listener(TracingListener::new(), EventFilter::All);
    mgr.initialize_device();

    let t = mgr.transport_mut();
    t.feed(motion([16000, 0, 0, 0, 0, 0]));
    t.feed(motion([16000, -8000, 0, 0, 0, 32767]));
    t.feed(vec![0x03, 0x01]);
    t.feed(vec![0x03, 0x00]);
    t.fail_next_read("cable pulled");

    for _ in 0..80 {
        clock.advance(Duration::from_millis(16));
        mgr.run_pending();
    }

    println!("{:?}", mgr.snapshot());
}
