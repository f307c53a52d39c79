use crate::event::{EventKind, SpaceMouseEvent};
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

/// Trait for reacting to notifications from the manager.
pub trait EventListener {
    fn on_event(&mut self, event: &SpaceMouseEvent);
}

/// Forward every event into a channel. A closed channel drops events silently.
impl EventListener for Sender<SpaceMouseEvent> {
    fn on_event(&mut self, event: &SpaceMouseEvent) {
        let _ = self.send(event.clone());
    }
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    MotionOnly,
    ButtonsOnly,
    LifecycleOnly,
    Custom(fn(&EventKind) -> bool),
}

impl EventFilter {
    pub fn accepts(&self, kind: &EventKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::MotionOnly => kind.is_motion(),
            EventFilter::ButtonsOnly => kind.is_button(),
            EventFilter::LifecycleOnly => kind.is_lifecycle(),
            EventFilter::Custom(f) => f(kind),
        }
    }
}

/// Opaque id returned by [`EventBus::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    listener: Box<dyn EventListener>,
    enabled: bool,
    filter: EventFilter,
}

/// Fan-out of notifications to registered listeners, in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener with a filter.
    pub fn add_listener(
        &mut self,
        listener: impl EventListener + 'static,
        filter: EventFilter,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely. Returns `false` if the id was unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers one event to all active and matching listeners.
    pub fn emit(&mut self, event: &SpaceMouseEvent) {
        for entry in self.listeners.values_mut() {
            if entry.enabled && entry.filter.accepts(&event.kind) {
                entry.listener.on_event(event);
            }
        }
    }

    /// Delivers a batch of events.
    pub fn emit_all(&mut self, events: &[SpaceMouseEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}
