//! Connect to the first SpaceMouse found and print every event as a JSON line.
//!
//! `RUST_LOG=spacemouse=debug cargo run --example poll --features hid`

use spacemouse::{
    EventFilter, EventKind, FilteredListener, SpaceMouseConfig, SpaceMouseEvent,
    SpaceMouseManager, TracingListener,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct JsonPrinter;

impl spacemouse::EventListener for JsonPrinter {
    fn on_event(&mut self, event: &SpaceMouseEvent) {
        match serde_json::to_string(&event.kind) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("encode failed: {e}"),
        }
    }
}

struct StopFlag(Arc<AtomicBool>);

impl spacemouse::EventListener for StopFlag {
    fn on_event(&mut self, _event: &SpaceMouseEvent) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn is_right_button(kind: &EventKind) -> bool {
    matches!(kind, EventKind::RightButtonPressed)
}

fn main() -> spacemouse::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SpaceMouseConfig::load(path)?,
        None => SpaceMouseConfig::default(),
    };

    let mut mgr = SpaceMouseManager::hid(&config)?;
    mgr.add_listener(TracingListener::new(), EventFilter::LifecycleOnly);
    // InputChanged carries no payload; the vector events already say it all.
    mgr.add_listener(
        FilteredListener::new(|e| e.kind != EventKind::InputChanged, JsonPrinter),
        EventFilter::All,
    );

    // Right button quits.
    let stop = Arc::new(AtomicBool::new(false));
    mgr.add_listener(StopFlag(Arc::clone(&stop)), EventFilter::Custom(is_right_button));

    if !mgr.initialize_device() {
        eprintln!("No supported SpaceMouse found");
        return Ok(());
    }
    mgr.set_enabled(true);
    println!("{}", mgr.snapshot().to_json()?);

    mgr.run_until(&stop);
    Ok(())
}
