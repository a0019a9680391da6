//! # Broadcast bus for engine events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. The engine publishes every event once;
//! the subscriber fan-out and any raw receivers from `Engine::events` each get a copy.
//!
//! ```text
//! Engine ──publish──► Bus ──┬──► fan-out listener ──► SubscriberSet ──► Subscribe impls
//!                           └──► Engine::events() receivers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits.
//! - **Bounded**: one ring buffer of `capacity` events shared by all receivers.
//! - **Lag**: slow receivers get `RecvError::Lagged(n)` and skip `n` events.
//! - **No persistence**: events published with no receiver are lost.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for engine events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes to all current receivers; dropped if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// New receiver observing events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receivers_see_later_events_only() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::Created));
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::Destroyed));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::Destroyed);
        assert_eq!(bus.receiver_count(), 1);
    }
}
