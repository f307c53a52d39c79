use crate::event::{EventKind, SpaceMouseEvent};
use crate::eventbus::EventListener;
use tracing::{debug, trace, warn};

/// A listener that logs every notification through `tracing`.
///
/// Motion vectors go to `trace` (they arrive at tick rate), device errors to
/// `warn`, everything else to `debug`.
#[derive(Debug, Default)]
pub struct TracingListener;

impl TracingListener {
    pub fn new() -> Self {
        TracingListener
    }
}

impl EventListener for TracingListener {
    fn on_event(&mut self, event: &SpaceMouseEvent) {
        match &event.kind {
            EventKind::TranslationInput(v) => trace!(%v, "translation"),
            EventKind::RotationInput(v) => trace!(%v, "rotation"),
            EventKind::InputChanged => trace!("input changed"),
            EventKind::DeviceError(message) => warn!(%message, "device error"),
            other => debug!(event = ?other, "spacemouse event"),
        }
    }
}
