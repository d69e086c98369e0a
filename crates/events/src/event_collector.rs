//! Event collector handed to actions for dispatching domain events

use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;
use worker_core::Event;

/// Ordered record of events an action dispatched.
///
/// Recording never fails and never inspects the name or payload.
#[derive(Default)]
pub struct EventCollector {
    events: Mutex<Vec<Event>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn record(&self, name: impl Into<String>, payload: Value) {
        let event = Event::new(name, payload);
        trace!(event = %event.name, "Event recorded");
        self.lock().push(event);
    }

    /// Alias of [`record`](Self::record)
    pub fn dispatch(&self, name: impl Into<String>, payload: Value) {
        self.record(name, payload);
    }

    /// Everything recorded so far, in order. The collector keeps its contents.
    pub fn drain(&self) -> Vec<Event> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCollector")
            .field("event_count", &self.len())
            .finish()
    }
}
