//! Shared engine internals and deferred side effects.
//!
//! Every mutation happens under `Inner::state`. Anything that can call user
//! code or touch another lock (callbacks, alert resolution, pool releases,
//! event publishing) is queued into [`Effects`] and run once the state lock is
//! released. Lock order when nesting is unavoidable: `state → bindings → pool`.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;

use super::EngineConfig;
use super::alerts::AlertOutcome;
use crate::error::panic_message;
use crate::events::{Bus, Event};
use crate::item::{Callbacks, LifecycleFn, NotificationId, NotificationItem};
use crate::layout::{Layout, StackStrategy};
use crate::pool::{Pooled, Recyclable, ResourcePool};
use crate::queue::NotificationQueue;
use crate::range::{HeightCache, RangeCalculator};
use crate::subscribers::SubscriberSet;
use crate::timer::{PausableTimer, TimerDriver};

pub(crate) struct Inner<R: Recyclable> {
    pub(crate) cfg: EngineConfig,
    pub(crate) state: Mutex<State>,
    pub(crate) bindings: Mutex<HashMap<NotificationId, Pooled<R>>>,
    pub(crate) pool: Mutex<ResourcePool<R>>,
    pub(crate) bus: Bus,
    pub(crate) subs: Arc<SubscriberSet>,
    pub(crate) driver: TimerDriver,
    pub(crate) range: RangeCalculator,
}

impl<R: Recyclable> Drop for Inner<R> {
    fn drop(&mut self) {
        // Last engine handle gone: stop timers, sweep and the fan-out listener.
        self.driver.token().cancel();
    }
}

pub(crate) struct State {
    pub(crate) queue: NotificationQueue,
    pub(crate) timers: HashMap<NotificationId, PausableTimer>,
    pub(crate) callbacks: HashMap<NotificationId, Callbacks>,
    pub(crate) alerts: HashMap<NotificationId, oneshot::Sender<AlertOutcome>>,
    pub(crate) heights: HeightCache,
    pub(crate) strategy: StackStrategy,
    pub(crate) layout: Layout,
    pub(crate) disposed: bool,
    pub(crate) last_create: Option<Instant>,
    pub(crate) next_seq: u64,
}

impl State {
    pub(crate) fn new(cfg: &EngineConfig) -> Self {
        Self {
            queue: NotificationQueue::new(cfg.max_items),
            timers: HashMap::new(),
            callbacks: HashMap::new(),
            alerts: HashMap::new(),
            heights: HeightCache::new(cfg.range.item_height),
            strategy: cfg.stack_strategy,
            layout: Layout::default(),
            disposed: false,
            last_create: None,
            next_seq: 0,
        }
    }
}

/// Side effects collected under the state lock, run after it is released.
#[derive(Default)]
pub(crate) struct Effects {
    alerts: Vec<(oneshot::Sender<AlertOutcome>, AlertOutcome)>,
    calls: Vec<(LifecycleFn, NotificationItem)>,
    releases: Vec<NotificationId>,
    events: Vec<Event>,
}

impl Effects {
    pub(crate) fn event(&mut self, ev: Event) {
        self.events.push(ev);
    }

    pub(crate) fn call(&mut self, f: Option<LifecycleFn>, item: &NotificationItem) {
        if let Some(f) = f {
            self.calls.push((f, item.clone()));
        }
    }

    pub(crate) fn release(&mut self, id: NotificationId) {
        self.releases.push(id);
    }

    pub(crate) fn resolve(&mut self, tx: oneshot::Sender<AlertOutcome>, outcome: AlertOutcome) {
        self.alerts.push((tx, outcome));
    }

    /// Runs everything in order: alert outcomes, callbacks, pool releases, events.
    pub(crate) fn run<R: Recyclable>(self, inner: &Inner<R>) {
        for (tx, outcome) in self.alerts {
            let _ = tx.send(outcome);
        }
        for (f, item) in self.calls {
            guarded(&item.id, "lifecycle", || f(&item));
        }
        if !self.releases.is_empty() {
            let handles: Vec<_> = {
                let mut bound = inner.bindings.lock();
                self.releases.iter().filter_map(|id| bound.remove(id)).collect()
            };
            if !handles.is_empty() {
                let mut pool = inner.pool.lock();
                for h in handles {
                    pool.release(h);
                }
            }
        }
        for ev in self.events {
            inner.bus.publish(ev);
        }
    }
}

/// Runs a caller callback, logging instead of propagating a panic.
pub(crate) fn guarded(id: &NotificationId, callback: &'static str, f: impl FnOnce()) {
    if let Err(p) = std::panic::catch_unwind(AssertUnwindSafe(f)) {
        tracing::error!(%id, callback, info = %panic_message(&*p), "callback panicked");
    }
}
