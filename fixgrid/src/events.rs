//! Events the grid publishes to its host.
//!
//! Listeners are registered per grid instance and removed through the id
//! handed out at subscription. Nothing is global.

use std::fmt;

use log::trace;

use crate::value::Row;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The selection changed. Carries the selected rows in input order.
    SelectionChanged(Vec<Row>),
    /// A body row was clicked outside any interactive element.
    RowClicked(Row),
    /// A message the host should show the user as a warning.
    Warning(String),
}

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

type Listener = Box<dyn FnMut(&GridEvent) + Send>;

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + Send + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn publish(&mut self, event: &GridEvent) {
        trace!("Publishing {event:?} to {} listeners", self.listeners.len());
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        let sink = seen.clone();
        let id = bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        bus.publish(&GridEvent::Warning("first".into()));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&GridEvent::Warning("second".into()));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![GridEvent::Warning("first".into())]
        );
    }
}
