use crate::event::SpaceMouseEvent;
use crate::eventbus::EventListener;

/// Wraps a listener and filters events based on a user-supplied predicate.
///
/// Unlike [`EventFilter::Custom`](crate::eventbus::EventFilter::Custom), the
/// predicate may capture state and sees the full timestamped event.
pub struct FilteredListener {
    predicate: Box<dyn FnMut(&SpaceMouseEvent) -> bool>,
    inner: Box<dyn EventListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl FnMut(&SpaceMouseEvent) -> bool + 'static,
        inner: impl EventListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl EventListener for FilteredListener {
    fn on_event(&mut self, event: &SpaceMouseEvent) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
