//! # Events emitted by the engine.
//!
//! [`EventKind`] has two groups:
//! - **Lifecycle**: an item was created, updated, shown, dismissed, evicted or destroyed
//! - **Subscriber**: a subscriber dropped an event or panicked
//!
//! Lifecycle events carry a snapshot of the item as it was at publish time.
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore order when events reach you through different paths.
//!
//! ## Example
//! ```rust
//! use toastvisor::{Event, EventKind, Kind, NotificationItem};
//!
//! let item = NotificationItem::new("saved".into(), Kind::Toast, "Saved");
//! let ev = Event::new(EventKind::Created).with_item(&item);
//!
//! assert_eq!(ev.kind, EventKind::Created);
//! assert_eq!(ev.id.as_ref().map(|id| id.as_str()), Some("saved"));
//! assert!(ev.is_lifecycle());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use serde::Serialize;

use crate::item::{NotificationId, NotificationItem};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    // === Lifecycle ===
    /// Item accepted into the queue and entering.
    ///
    /// Sets: `id`, `item`
    Created,

    /// Item fields changed through `update`.
    ///
    /// Sets: `id`, `item` (after the change)
    Updated,

    /// Enter animation finished; item is visible.
    ///
    /// Sets: `id`, `item`
    Shown,

    /// Item started leaving (timer expiry, dismiss or dismiss-all).
    ///
    /// Sets: `id`, `item`, `reason`
    Dismissed,

    /// Item pushed out by the queue capacity. Followed by `Destroyed`.
    ///
    /// Sets: `id`, `item`
    Evicted,

    /// Item removed from the queue; terminal.
    ///
    /// Sets: `id`, `item`
    Destroyed,

    // === Subscriber ===
    /// Subscriber panicked while handling an event.
    ///
    /// Sets: `source` (subscriber name), `reason` (panic message)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `source` (subscriber name), `reason` ("full" or "closed")
    SubscriberOverflow,
}

impl EventKind {
    /// Stable kebab-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Shown => "shown",
            EventKind::Dismissed => "dismissed",
            EventKind::Evicted => "evicted",
            EventKind::Destroyed => "destroyed",
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
        }
    }
}

/// Engine event with optional metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Process-wide monotonic sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    pub kind: EventKind,
    /// Affected item id.
    pub id: Option<NotificationId>,
    /// Snapshot of the affected item.
    pub item: Option<Arc<NotificationItem>>,
    /// Subscriber name for subscriber events.
    pub source: Option<Arc<str>>,
    /// Free-form cause ("timeout", "dismiss", "full", panic text...).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of `kind` stamped with the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            id: None,
            item: None,
            source: None,
            reason: None,
        }
    }

    /// Attaches an item snapshot and its id.
    #[must_use]
    pub fn with_item(mut self, item: &NotificationItem) -> Self {
        self.id = Some(item.id.clone());
        self.item = Some(Arc::new(item.clone()));
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn subscriber_panicked(name: &'static str, info: String) -> Self {
        Self::new(EventKind::SubscriberPanicked)
            .with_source(name)
            .with_reason(info)
    }

    pub fn subscriber_overflow(name: &'static str, reason: &'static str) -> Self {
        Self::new(EventKind::SubscriberOverflow)
            .with_source(name)
            .with_reason(reason)
    }

    /// True for item lifecycle events.
    pub fn is_lifecycle(&self) -> bool {
        !matches!(
            self.kind,
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Kind;

    #[test]
    fn test_seq_increases() {
        let a = Event::new(EventKind::Created);
        let b = Event::new(EventKind::Created);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_subscriber_events_are_not_lifecycle() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(!ev.is_lifecycle());
        assert_eq!(ev.source.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
    }

    #[test]
    fn test_event_serializes_item_snapshot() {
        let item = NotificationItem::new("x".into(), Kind::Message, "hi");
        let ev = Event::new(EventKind::Dismissed)
            .with_item(&item)
            .with_reason("timeout");
        let v = serde_json::to_value(ev).unwrap();
        assert_eq!(v["kind"], "dismissed");
        assert_eq!(v["id"], "x");
        assert_eq!(v["item"]["message"], "hi");
        assert_eq!(v["reason"], "timeout");
    }
}
