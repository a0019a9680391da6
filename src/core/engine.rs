//! # Engine facade.
//!
//! [`Engine`] is the only entry point the rendering layer needs. It is a cheap,
//! cloneable handle; construct one per composition root with
//! [`Engine::builder`] and pass it where needed.
//!
//! ## Architecture
//! ```text
//!  caller ──create/update/dismiss──► Engine ──► state lock ──► NotificationQueue
//!                                      │                          │
//!                                      │                  TimerDriver: per-item PausableTimer,
//!                                      │                  enter / removal holds
//!                                      │                          │
//!                                      ├──► relayout ──► Layout (offsets written back)
//!                                      ├──► effects (after unlock):
//!                                      │       alert outcomes, on_close/on_destroy,
//!                                      │       pool releases, Bus::publish
//!                                      └──► ResourcePool / bindings (rendering handles)
//! ```
//!
//! ## Rules
//! - Unknown ids give `false`/`None`; nothing panics on bad input.
//! - After [`dispose`](Engine::dispose), `create` logs a warning and returns `None`.
//! - Callbacks run outside the lock; a panicking callback is logged and ignored.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::builder::EngineBuilder;
use super::state::{Inner, guarded};
use super::EngineConfig;
use crate::error::EngineError;
use crate::events::{Event, EventKind};
use crate::item::{
    ItemPatch, Kind, NotificationId, NotificationItem, NotifyOptions, Position, Variant,
};
use crate::layout::{Layout, StackStrategy};
use crate::pool::{PoolStats, Pooled, Recyclable};
use crate::queue::QueueDebugInfo;
use crate::range::VisibleRange;
use crate::subscribers::{Subscribe, SubscriberFn, Subscription};

/// Notification lifecycle engine.
pub struct Engine<R: Recyclable = ()> {
    pub(crate) inner: Arc<Inner<R>>,
}

impl<R: Recyclable> Clone for Engine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Recyclable> fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.inner.state.lock();
        f.debug_struct("Engine")
            .field("items", &st.queue.len())
            .field("strategy", &st.strategy)
            .field("disposed", &st.disposed)
            .finish()
    }
}

/// Point-in-time diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub queue: QueueDebugInfo,
    pub pool: PoolStats,
    pub timers: usize,
    pub pending_alerts: usize,
    pub bound_handles: usize,
    pub subscribers: usize,
    pub strategy: StackStrategy,
    pub disposed: bool,
}

impl Engine<()> {
    /// Starts building an engine.
    pub fn builder(cfg: EngineConfig) -> EngineBuilder<()> {
        EngineBuilder::new(cfg)
    }

    /// Engine with no subscribers and no pooled resource type.
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        EngineBuilder::new(cfg).build()
    }
}

impl<R: Recyclable> Engine<R> {
    pub fn config(&self) -> &EngineConfig {
        &self.inner.cfg
    }

    // === Lifecycle ===

    /// Creates an item and returns its id.
    ///
    /// Returns `None` when the engine is disposed, the call is throttled, or
    /// `opts.id` is already active. With duplicate prevention on, a same-kind
    /// active item with an equal message yields that item's id instead.
    pub fn create(
        &self,
        kind: Kind,
        variant: Variant,
        message: impl Into<String>,
        opts: NotifyOptions,
    ) -> Option<NotificationId> {
        let message = message.into();
        let inner = &self.inner;
        inner.with_state(|st, fx| inner.create_locked(st, kind, variant, message, opts, fx))
    }

    /// Applies a partial update. A `duration` change restarts the timer.
    pub fn update(&self, id: &str, patch: ItemPatch) -> bool {
        let inner = &self.inner;
        inner.with_state(|st, fx| inner.update_locked(st, id, &patch, fx))
    }

    /// Starts the exit of an active item. Repeated calls are no-ops.
    pub fn dismiss(&self, id: &str) -> bool {
        let inner = &self.inner;
        inner.with_state(|st, fx| inner.dismiss_locked(st, id, "dismiss", fx))
    }

    /// Dismisses every active item, or only those of `kind`. Returns how many.
    pub fn dismiss_all(&self, kind: Option<Kind>) -> usize {
        let inner = &self.inner;
        inner.with_state(|st, fx| inner.dismiss_all_locked(st, kind, fx))
    }

    /// Removes an item immediately, skipping the exit hold.
    pub fn remove(&self, id: &str) -> bool {
        let inner = &self.inner;
        inner.with_state(|st, fx| inner.remove_locked(st, id, fx))
    }

    /// Fires the item's `on_click`. `false` if the item is unknown.
    pub fn click(&self, id: &str) -> bool {
        let found = {
            let st = self.inner.state.lock();
            st.queue.get(id).map(|it| {
                let f = st.callbacks.get(id).and_then(|c| c.on_click.clone());
                (f, it.clone())
            })
        };
        match found {
            Some((f, item)) => {
                if let Some(f) = f {
                    guarded(&item.id, "on_click", || f(&item));
                }
                true
            }
            None => false,
        }
    }

    /// Changes the queue capacity; items trimmed from the front are torn down.
    pub fn set_max_items(&self, max_items: usize) -> usize {
        let inner = &self.inner;
        inner.with_state(|st, fx| {
            let trimmed = st.queue.set_max_size(max_items);
            let n = trimmed.len();
            for item in trimmed {
                inner.retire(st, item, true, fx);
            }
            if n > 0 {
                inner.relayout(st);
            }
            n
        })
    }

    /// Tears the engine down: fires pending close/destroy callbacks, resolves
    /// alerts, stops all timers and clears the pool. Idempotent.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().disposed
    }

    // === Queries ===

    pub fn get(&self, id: &str) -> Option<NotificationItem> {
        self.inner.state.lock().queue.get(id).cloned()
    }

    /// Every queued item in priority order.
    pub fn get_all(&self) -> Vec<NotificationItem> {
        self.inner.state.lock().queue.iter().cloned().collect()
    }

    pub fn get_by_position(&self, position: Position) -> Vec<NotificationItem> {
        let st = self.inner.state.lock();
        st.queue.get_by_position(position).into_iter().cloned().collect()
    }

    pub fn get_by_kind(&self, kind: Kind) -> Vec<NotificationItem> {
        let st = self.inner.state.lock();
        st.queue.get_by_kind(kind).into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().queue.is_empty()
    }

    // === Timers ===

    /// Freezes the item's countdown (hover). `false` if it has no live timer.
    pub fn pause_timer(&self, id: &str) -> bool {
        let mut st = self.inner.state.lock();
        let Some(timer) = st.timers.get(id).cloned() else {
            return false;
        };
        timer.pause();
        let remaining = timer.remaining();
        st.queue.with_item_mut(id, |it| {
            it.paused = true;
            it.remaining = remaining;
        });
        true
    }

    /// Continues a paused countdown. `false` if it has no live timer.
    pub fn resume_timer(&self, id: &str) -> bool {
        let mut st = self.inner.state.lock();
        let Some(timer) = st.timers.get(id).cloned() else {
            return false;
        };
        timer.resume();
        st.queue.with_item_mut(id, |it| it.paused = false);
        true
    }

    /// Time left before the item expires; zero for untimed or leaving items.
    pub fn remaining(&self, id: &str) -> Option<Duration> {
        let st = self.inner.state.lock();
        st.queue.get(id)?;
        Some(st.timers.get(id).map_or(Duration::ZERO, |t| t.remaining()))
    }

    pub fn is_paused(&self, id: &str) -> bool {
        self.inner
            .state
            .lock()
            .timers
            .get(id)
            .is_some_and(|t| t.is_paused())
    }

    // === Events ===

    /// Attaches a subscriber; keep the returned handle to detach it later.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe>) -> Subscription {
        let id = self.inner.subs.add(sub);
        Subscription::new(id, &self.inner.subs)
    }

    /// Runs `f` for every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, f: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(SubscriberFn::new(kind.as_str(), f).with_filter(kind)))
    }

    /// Raw receiver of every event published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    // === Pool ===

    /// Checks out a handle of `kind`, reusing an idle one when possible.
    ///
    /// `creator` runs under the pool lock and must not call back into the pool.
    pub fn acquire<F>(&self, kind: Kind, creator: F) -> Pooled<R>
    where
        F: FnOnce() -> R,
    {
        self.inner.pool.lock().acquire(kind, creator)
    }

    /// Returns a handle to the pool. `false` if it was discarded.
    pub fn release(&self, handle: Pooled<R>) -> bool {
        self.inner.pool.lock().release(handle)
    }

    pub fn warm<F>(&self, kind: Kind, count: usize, creator: F) -> usize
    where
        F: FnMut() -> R,
    {
        self.inner.pool.lock().warm(kind, count, creator)
    }

    pub fn clear_pool(&self, kind: Option<Kind>) {
        self.inner.pool.lock().clear(kind);
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.inner.pool.lock().stats(Instant::now())
    }

    pub fn enable_pool(&self) {
        self.inner.pool.lock().enable();
    }

    pub fn disable_pool(&self) {
        self.inner.pool.lock().disable();
    }

    pub fn set_pool_max_size(&self, max_per_kind: usize) {
        self.inner.pool.lock().set_max_size(max_per_kind);
    }

    /// Ties a handle to an item; it goes back to the pool when the item is removed.
    ///
    /// If `id` is not queued the handle is released right away and `false` returned.
    /// A handle already bound to `id` is released.
    pub fn bind(&self, id: &str, handle: Pooled<R>) -> bool {
        let (bound, displaced) = {
            let st = self.inner.state.lock();
            match st.queue.get(id) {
                Some(item) => {
                    let prev = self.inner.bindings.lock().insert(item.id.clone(), handle);
                    (true, prev)
                }
                None => (false, Some(handle)),
            }
        };
        if let Some(h) = displaced {
            self.inner.pool.lock().release(h);
        }
        bound
    }

    /// Runs `f` on the handle bound to `id`.
    pub fn with_bound<T>(&self, id: &str, f: impl FnOnce(&mut R) -> T) -> Option<T> {
        let mut bindings = self.inner.bindings.lock();
        bindings.get_mut(id).map(|h| f(h))
    }

    /// Detaches and returns the handle bound to `id`.
    pub fn unbind(&self, id: &str) -> Option<Pooled<R>> {
        self.inner.bindings.lock().remove(id)
    }

    // === Layout & range ===

    /// Switches strategy and recomputes layout; queue contents are untouched.
    pub fn set_stack_strategy(&self, strategy: StackStrategy) {
        let inner = &self.inner;
        let mut st = inner.state.lock();
        st.strategy = strategy;
        inner.relayout(&mut st);
    }

    pub fn stack_strategy(&self) -> StackStrategy {
        self.inner.state.lock().strategy
    }

    /// Latest layout pass.
    pub fn layout(&self) -> Layout {
        self.inner.state.lock().layout.clone()
    }

    /// Stores the first measured height of an item. Later calls are ignored
    /// until [`resize_item`](Self::resize_item).
    pub fn record_height(&self, id: &str, height: f32) -> bool {
        let inner = &self.inner;
        let mut st = inner.state.lock();
        let Some(id) = st.queue.get(id).map(|it| it.id.clone()) else {
            return false;
        };
        let stored = st.heights.record(&id, height);
        if stored {
            inner.relayout(&mut st);
        }
        stored
    }

    /// Replaces an item's height after it resized.
    pub fn resize_item(&self, id: &str, height: f32) -> bool {
        let inner = &self.inner;
        let mut st = inner.state.lock();
        let Some(id) = st.queue.get(id).map(|it| it.id.clone()) else {
            return false;
        };
        st.heights.resize(&id, height);
        inner.relayout(&mut st);
        true
    }

    /// Items to materialize at `position` (or across all anchors) for a
    /// viewport, indexed in layout order.
    pub fn visible_range(
        &self,
        position: Option<Position>,
        scroll_offset: f32,
        viewport_height: f32,
    ) -> VisibleRange {
        let st = self.inner.state.lock();
        let heights: Vec<f32> = st
            .layout
            .placements
            .iter()
            .filter(|p| position.is_none_or(|pos| pos == p.position))
            .map(|p| st.heights.height(p.id.as_str()))
            .collect();
        self.inner
            .range
            .compute_visible_range(scroll_offset, viewport_height, &heights)
    }

    /// True when `position` holds enough items for windowing to apply.
    pub fn is_virtualized(&self, position: Position) -> bool {
        let st = self.inner.state.lock();
        self.inner
            .range
            .is_enabled(st.layout.at(position).count())
    }

    // === Diagnostics ===

    pub fn stats(&self) -> EngineStats {
        let (queue, timers, pending_alerts, strategy, disposed) = {
            let st = self.inner.state.lock();
            (
                st.queue.debug_info(),
                st.timers.len(),
                st.alerts.len(),
                st.strategy,
                st.disposed,
            )
        };
        EngineStats {
            queue,
            pool: self.pool_stats(),
            timers,
            pending_alerts,
            bound_handles: self.inner.bindings.lock().len(),
            subscribers: self.inner.subs.len(),
            strategy,
            disposed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Priority, Status};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cfg() -> EngineConfig {
        EngineConfig {
            create_throttle: Duration::ZERO,
            ..EngineConfig::default()
        }
    }

    fn engine() -> Engine {
        Engine::new(cfg()).unwrap()
    }

    fn toast<R: Recyclable>(e: &Engine<R>, msg: &str) -> NotificationId {
        e.create(Kind::Toast, Variant::Info, msg, NotifyOptions::new())
            .unwrap()
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce(&NotificationItem) + Send + 'static) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&n);
        (n, move |_: &NotificationItem| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<(EventKind, String)> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            let id = ev.id.map(|id| id.to_string()).unwrap_or_default();
            out.push((ev.kind, id));
        }
        out
    }

    #[test]
    fn test_build_outside_runtime_fails() {
        assert!(matches!(Engine::new(cfg()), Err(EngineError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generated_ids_are_unique() {
        let e = engine();
        let ids: HashSet<_> = (0..200).map(|i| toast(&e, &format!("m{i}"))).collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(e.len(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_caller_id_rejected() {
        let e = engine();
        let opts = || NotifyOptions::new().with_id("save");
        assert!(e.create(Kind::Toast, Variant::Info, "a", opts()).is_some());
        assert!(e.create(Kind::Toast, Variant::Info, "b", opts()).is_none());
        assert_eq!(e.get("save").unwrap().message, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_orders_by_priority_then_insertion() {
        let e = engine();
        let low = e
            .create(Kind::Toast, Variant::Info, "low", NotifyOptions::new().with_priority(Priority::Low))
            .unwrap();
        let n1 = toast(&e, "n1");
        let high = e
            .create(Kind::Toast, Variant::Info, "high", NotifyOptions::new().with_priority(Priority::High))
            .unwrap();
        let n2 = toast(&e, "n2");
        let order: Vec<_> = e.get_all().into_iter().map(|it| it.id).collect();
        assert_eq!(order, vec![high, n1, n2, low]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_indices_follow_updates_and_removal() {
        let e = engine();
        let a = toast(&e, "a");
        let m = e
            .create(Kind::Message, Variant::Info, "m", NotifyOptions::new())
            .unwrap();
        assert_eq!(e.get_by_position(Position::Top).len(), 1);

        assert!(e.update(a.as_str(), ItemPatch::new().position(Position::Top)));
        assert_eq!(e.get_by_position(Position::Top).len(), 2);
        assert!(e.get_by_position(Position::TopRight).is_empty());

        assert!(e.update(a.as_str(), ItemPatch::new().kind(Kind::Message)));
        assert_eq!(e.get_by_kind(Kind::Message).len(), 2);
        assert!(e.get_by_kind(Kind::Toast).is_empty());

        assert!(e.remove(m.as_str()));
        assert_eq!(e.get_by_kind(Kind::Message).len(), 1);
        assert!(!e.update("missing", ItemPatch::new().message("x")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_goes_through_lifecycle() {
        let e = engine();
        let mut rx = e.events();
        let id = toast(&e, "hello");
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Entering);

        tokio::time::sleep(Duration::from_millis(310)).await;
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Visible);

        tokio::time::sleep(Duration::from_millis(2700)).await;
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Leaving);

        tokio::time::sleep(Duration::from_millis(310)).await;
        assert!(e.get(id.as_str()).is_none());

        let kinds: Vec<_> = drain(&mut rx).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Created,
                EventKind::Shown,
                EventKind::Dismissed,
                EventKind::Destroyed
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown() {
        let e = engine();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "hover me",
                NotifyOptions::new().with_duration(Duration::from_millis(500)),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(e.pause_timer(id.as_str()));
        assert!(e.is_paused(id.as_str()));
        let item = e.get(id.as_str()).unwrap();
        assert!(item.paused);
        assert_eq!(item.remaining, Duration::from_millis(300));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(e.get(id.as_str()).unwrap().status.is_active());
        assert_eq!(e.remaining(id.as_str()), Some(Duration::from_millis(300)));

        assert!(e.resume_timer(id.as_str()));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(e.get(id.as_str()).unwrap().status.is_active());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Leaving);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_without_timer_is_refused() {
        let e = engine();
        let id = e
            .create(Kind::Toast, Variant::Loading, "busy", NotifyOptions::new())
            .unwrap();
        assert!(!e.pause_timer(id.as_str()));
        assert!(!e.resume_timer("missing"));
        assert_eq!(e.remaining(id.as_str()), Some(Duration::ZERO));
        assert_eq!(e.remaining("missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_is_idempotent() {
        let e = engine();
        let (closed, on_close) = counter();
        let (destroyed, on_destroy) = counter();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "bye",
                NotifyOptions::new().on_close(on_close).on_destroy(on_destroy),
            )
            .unwrap();

        assert!(e.dismiss(id.as_str()));
        assert!(!e.dismiss(id.as_str()));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(310)).await;
        assert!(e.get(id.as_str()).is_none());
        assert!(!e.dismiss(id.as_str()));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reused_id_ignores_stale_removal() {
        let e = engine();
        let opts = || NotifyOptions::new().with_id("x");
        e.create(Kind::Toast, Variant::Info, "first", opts()).unwrap();
        assert!(e.dismiss("x"));
        assert!(e.remove("x"));
        e.create(Kind::Toast, Variant::Info, "second", opts()).unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        let item = e.get("x").unwrap();
        assert_eq!(item.message, "second");
        assert_eq!(item.status, Status::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_skips_close_callback() {
        let e = engine();
        let (closed, on_close) = counter();
        let (destroyed, on_destroy) = counter();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "gone",
                NotifyOptions::new().on_close(on_close).on_destroy(on_destroy),
            )
            .unwrap();
        assert!(e.remove(id.as_str()));
        assert!(!e.remove(id.as_str()));
        assert_eq!(closed.load(Ordering::SeqCst), 0);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest() {
        let e = Engine::new(EngineConfig {
            max_items: 2,
            ..cfg()
        })
        .unwrap();
        let mut rx = e.events();
        let a = toast(&e, "a");
        let b = toast(&e, "b");
        let c = toast(&e, "c");

        assert_eq!(e.len(), 2);
        assert!(e.get(a.as_str()).is_none());
        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                (EventKind::Created, a.to_string()),
                (EventKind::Created, b.to_string()),
                (EventKind::Evicted, a.to_string()),
                (EventKind::Destroyed, a.to_string()),
                (EventKind::Created, c.to_string()),
            ]
        );

        assert_eq!(e.set_max_items(1), 1);
        assert!(e.get(b.as_str()).is_none());
        assert!(e.get(c.as_str()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_message_returns_existing_id() {
        let e = Engine::new(EngineConfig {
            prevent_duplicates: true,
            ..cfg()
        })
        .unwrap();
        let first = toast(&e, "Saved");
        let second = toast(&e, "  saved ");
        assert_eq!(first, second);
        assert_eq!(e.len(), 1);

        // Other kinds are not duplicates.
        let m = e
            .create(Kind::Message, Variant::Info, "Saved", NotifyOptions::new())
            .unwrap();
        assert_ne!(m, first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_creates_are_throttled() {
        let e = Engine::new(EngineConfig::default()).unwrap();
        assert!(e.create(Kind::Toast, Variant::Info, "a", NotifyOptions::new()).is_some());
        assert!(e.create(Kind::Toast, Variant::Info, "b", NotifyOptions::new()).is_none());
        assert!(e.create(Kind::Toast, Variant::Error, "c", NotifyOptions::new()).is_some());
        assert!(
            e.create(Kind::Toast, Variant::Info, "d", NotifyOptions::new().with_priority(Priority::High))
                .is_some()
        );

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(e.create(Kind::Toast, Variant::Info, "e", NotifyOptions::new()).is_some());
        assert_eq!(e.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_does_not_throttle_next_toast() {
        let e = Engine::new(EngineConfig::default()).unwrap();
        let _handle = e.confirm("Delete?", NotifyOptions::new()).unwrap();
        assert!(e.create(Kind::Toast, Variant::Info, "saved", NotifyOptions::new()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_priority_does_not_reset_throttle_window() {
        let e = Engine::new(EngineConfig::default()).unwrap();
        let high = NotifyOptions::new().with_priority(Priority::High);
        assert!(e.create(Kind::Toast, Variant::Info, "a", NotifyOptions::new()).is_some());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(e.create(Kind::Toast, Variant::Info, "b", high).is_some());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(e.create(Kind::Toast, Variant::Info, "c", NotifyOptions::new()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_all_removes_batch_together() {
        let e = engine();
        let ids: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let anim = Duration::from_millis(100 * (i as u64 + 1));
                e.create(Kind::Toast, Variant::Info, m, NotifyOptions::new().with_animation(anim))
                    .unwrap()
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(310)).await;

        assert_eq!(e.dismiss_all(None), 3);
        assert_eq!(e.dismiss_all(None), 0);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(ids.iter().all(|id| e.get(id.as_str()).is_some()));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(e.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_update_restarts_timer() {
        let e = engine();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "a",
                NotifyOptions::new().with_duration(Duration::from_millis(1000)),
            )
            .unwrap();
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert!(e.update(id.as_str(), ItemPatch::new().duration(Duration::from_millis(2000))));
        assert_eq!(e.remaining(id.as_str()), Some(Duration::from_millis(2000)));

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(e.get(id.as_str()).unwrap().status.is_active());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Leaving);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_duration_update_keeps_pause() {
        let e = engine();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "a",
                NotifyOptions::new().with_duration(Duration::from_millis(500)),
            )
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(e.pause_timer(id.as_str()));

        let patch = ItemPatch::new()
            .message("still here")
            .duration(Duration::from_millis(500));
        assert!(e.update(id.as_str(), patch));
        assert!(e.is_paused(id.as_str()));
        let item = e.get(id.as_str()).unwrap();
        assert_eq!(item.message, "still here");
        assert!(item.paused);
        assert_eq!(item.remaining, Duration::from_millis(300));
        assert_eq!(e.remaining(id.as_str()), Some(Duration::from_millis(300)));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(e.get(id.as_str()).unwrap().status.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_reuses_and_caps_handles() {
        let e = Engine::builder(cfg())
            .with_resource::<String>()
            .build()
            .unwrap();
        e.set_pool_max_size(2);

        let handles: Vec<_> = (0..3)
            .map(|i| e.acquire(Kind::Toast, || format!("view-{i}")))
            .collect();
        for h in handles {
            e.release(h);
        }
        assert_eq!(e.pool_stats().available(Kind::Toast), 2);

        let h = e.acquire(Kind::Toast, || unreachable!("idle handle should be reused"));
        assert!(h.is_empty());
        assert_eq!(e.pool_stats().available(Kind::Toast), 1);

        e.disable_pool();
        assert!(!e.release(h));
        assert_eq!(e.pool_stats().available(Kind::Toast), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_discarded_handles_do_not_stay_in_use() {
        let e = Engine::builder(cfg())
            .with_resource::<String>()
            .build()
            .unwrap();
        for i in 0..100 {
            drop(e.acquire(Kind::Toast, || format!("view-{i}")));
        }
        let raw = e.acquire(Kind::Toast, String::new).into_inner();
        assert!(raw.is_empty());

        let id = toast(&e, "bound");
        assert!(e.bind(id.as_str(), e.acquire(Kind::Toast, String::new)));
        drop(e.unbind(id.as_str()));
        assert!(e.bind(id.as_str(), e.acquire(Kind::Toast, String::new)));
        assert_eq!(e.pool_stats().in_use, 1);

        e.dispose();
        assert_eq!(e.pool_stats().in_use, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_handle_released_on_removal() {
        let e = Engine::builder(cfg())
            .with_resource::<String>()
            .build()
            .unwrap();
        let id = e
            .create(Kind::Toast, Variant::Info, "a", NotifyOptions::new())
            .unwrap();
        let h = e.acquire(Kind::Toast, || "view".to_string());
        assert!(e.bind(id.as_str(), h));
        assert_eq!(e.with_bound(id.as_str(), |s| s.len()), Some(4));
        assert_eq!(e.stats().bound_handles, 1);

        assert!(e.remove(id.as_str()));
        assert_eq!(e.stats().bound_handles, 0);
        assert_eq!(e.pool_stats().available(Kind::Toast), 1);

        // Binding to an unknown id hands the handle straight back.
        let h = e.acquire(Kind::Toast, String::new);
        assert!(!e.bind("missing", h));
        assert_eq!(e.pool_stats().available(Kind::Toast), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_callbacks_are_contained() {
        let e = engine();
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "a",
                NotifyOptions::new()
                    .on_click(|_| panic!("click"))
                    .on_destroy(|_| panic!("destroy")),
            )
            .unwrap();
        assert!(e.click(id.as_str()));
        assert!(e.remove(id.as_str()));
        assert!(!e.click(id.as_str()));
        assert!(e.create(Kind::Toast, Variant::Info, "b", NotifyOptions::new()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_fires_every_time() {
        let e = engine();
        let clicks = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&clicks);
        let id = e
            .create(
                Kind::Toast,
                Variant::Info,
                "a",
                NotifyOptions::new().on_click(move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        e.click(id.as_str());
        e.click(id.as_str());
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_filtered_events() {
        let e = engine();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sub = e.on(EventKind::Destroyed, move |ev| {
            s.lock().push(ev.id.clone());
        });
        let id = toast(&e, "a");
        e.remove(id.as_str());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*seen.lock(), vec![Some(id)]);

        assert!(sub.unsubscribe());
        let id = toast(&e, "b");
        e.remove(id.as_str());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_tears_down_and_refuses_creates() {
        let e = engine();
        let (closed, on_close) = counter();
        let (destroyed, on_destroy) = counter();
        e.create(
            Kind::Toast,
            Variant::Info,
            "a",
            NotifyOptions::new().on_close(on_close).on_destroy(on_destroy),
        )
        .unwrap();

        e.dispose();
        e.dispose();
        assert!(e.is_disposed());
        assert!(e.is_empty());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(e.create(Kind::Toast, Variant::Info, "b", NotifyOptions::new()).is_none());
        assert!(!e.dismiss("anything"));
        assert_eq!(e.stats().timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_strategy_switch_keeps_queue() {
        let e = engine();
        for i in 0..5 {
            toast(&e, &format!("m{i}"));
        }
        e.set_stack_strategy(StackStrategy::Replace);
        assert_eq!(e.stack_strategy(), StackStrategy::Replace);
        assert_eq!(e.len(), 5);
        assert_eq!(e.layout().at(Position::TopRight).filter(|p| p.visible).count(), 1);

        e.set_stack_strategy(StackStrategy::Stack);
        assert_eq!(e.layout().at(Position::TopRight).filter(|p| p.visible).count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offsets_follow_measured_heights() {
        let e = engine();
        let older = toast(&e, "older");
        let newer = toast(&e, "newer");
        assert!(e.record_height(newer.as_str(), 100.0));
        assert!(!e.record_height(newer.as_str(), 40.0));
        assert_eq!(e.get(older.as_str()).unwrap().vertical_offset, 108.0);

        assert!(e.resize_item(newer.as_str(), 40.0));
        assert_eq!(e.get(older.as_str()).unwrap().vertical_offset, 48.0);
        assert!(!e.resize_item("missing", 10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_range_over_position() {
        let e = engine();
        for i in 0..20 {
            toast(&e, &format!("m{i}"));
        }
        assert!(e.is_virtualized(Position::TopRight));
        assert!(!e.is_virtualized(Position::Top));

        let r = e.visible_range(Some(Position::TopRight), 600.0, 120.0);
        assert_eq!((r.start, r.end), (3, 19));
        assert_eq!(r.top_offset, 180.0);

        let r = e.visible_range(Some(Position::Top), 0.0, 120.0);
        assert!(r.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_snapshot_serializes() {
        let e = engine();
        toast(&e, "a");
        let v = serde_json::to_value(e.stats()).unwrap();
        assert_eq!(v["queue"]["len"], 1);
        assert_eq!(v["timers"], 1);
        assert_eq!(v["strategy"], "stack");
        assert_eq!(v["disposed"], false);
    }
}
