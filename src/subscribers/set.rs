//! # Non-blocking fan-out to subscribers.
//!
//! [`SubscriberSet`] hands each event to every attached subscriber without
//! waiting for any of them. Subscribers can be attached and detached while the
//! engine runs.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► sub1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker 2 ──► sub2.on_event()
//!     └──► [queue N] ──► worker N ──► subN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**, no ordering across subscribers.
//! - **Overflow**: the event is dropped for that subscriber only and
//!   `SubscriberOverflow` is published (never for an overflow event itself).
//! - **Panics** are caught with `catch_unwind`, reported as `SubscriberPanicked`,
//!   and the worker keeps going.
//! - **Detach**: removing a subscriber drops its sender; the worker drains and exits.
//!   Dropping the set detaches everyone.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Identity of an attached subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct SubscriberChannel {
    id: SubscriptionId,
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    channels: Mutex<Vec<SubscriberChannel>>,
    next_id: AtomicU64,
    handle: Handle,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates an empty set whose workers run on `handle`.
    pub fn new(handle: Handle, bus: Bus) -> Self {
        Self {
            channels: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            handle,
            bus,
        }
    }

    /// Attaches `sub` and spawns its worker.
    pub fn add(&self, sub: Arc<dyn Subscribe>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let name = sub.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
        let bus = self.bus.clone();

        self.handle.spawn(async move {
            while let Some(ev) = rx.recv().await {
                let fut = sub.on_event(ev.as_ref());
                if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    let info = panic_message(&*panic_err);
                    tracing::error!(subscriber = sub.name(), %info, "subscriber panicked");
                    bus.publish(Event::subscriber_panicked(sub.name(), info));
                }
            }
        });

        self.channels.lock().push(SubscriberChannel {
            id,
            name,
            sender: tx,
        });
        id
    }

    /// Detaches a subscriber. Returns `false` if it was not attached.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut channels = self.channels.lock();
        let before = channels.len();
        channels.retain(|c| c.id != id);
        channels.len() != before
    }

    /// Number of attached subscribers.
    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.lock().is_empty()
    }

    /// Emits a borrowed event (cloned once into an `Arc`).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a shared event to every subscriber with `try_send`.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_evt = matches!(event.kind, EventKind::SubscriberOverflow);
        let channels = self.channels.lock();

        for channel in channels.iter() {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow_evt {
                tracing::warn!(subscriber = channel.name, reason, "subscriber dropped event");
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }
}

impl fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.channels.lock().iter().map(|c| c.name).collect();
        f.debug_struct("SubscriberSet")
            .field("subscribers", &names)
            .finish()
    }
}

/// Handle to an attached subscriber.
///
/// Dropping it keeps the subscriber attached; call [`unsubscribe`](Self::unsubscribe)
/// to detach.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    set: Weak<SubscriberSet>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, set: &Arc<SubscriberSet>) -> Self {
        Self {
            id,
            set: Arc::downgrade(set),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Detaches the subscriber. Returns `false` if already detached or the
    /// engine is gone.
    pub fn unsubscribe(self) -> bool {
        self.set.upgrade().is_some_and(|set| set.remove(self.id))
    }
}
