//! # Item state machine.
//!
//! ```text
//! create ──► Pending ──► Entering ──(animation)──► Visible
//!                           │                         │
//!                           └──────┬──────────────────┘
//!               timer expiry / dismiss / dismiss_all / alert resolved
//!                                  ▼
//!                               Leaving ──(animation)──► Removed
//! ```
//!
//! ## Rules
//! - `Leaving` cancels the item's timer first, then queues `on_close`.
//! - `Removed` deletes the item and its index entries, queues `on_destroy`, and
//!   releases a bound pooled handle.
//! - Deferred work carries `(id, seq)` and re-checks the item's presence, seq and
//!   status on wake-up; anything stale is dropped.
//! - Bulk dismissal schedules one removal for the whole batch, held for the
//!   longest animation among them.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::alerts::AlertOutcome;
use super::state::{Effects, Inner, State};
use crate::events::{Event, EventKind};
use crate::item::{
    ItemPatch, Kind, NotificationId, NotificationItem, NotifyOptions, Priority, Status, Variant,
};
use crate::layout::{LayoutItem, apply_strategy};
use crate::pool::Recyclable;
use crate::queue::Enqueue;

type Batch = Vec<(NotificationId, u64)>;

impl<R: Recyclable> Inner<R> {
    /// Locks state, runs `f`, unlocks, then runs the collected effects.
    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&mut State, &mut Effects) -> T) -> T {
        let mut fx = Effects::default();
        let out = {
            let mut st = self.state.lock();
            f(&mut st, &mut fx)
        };
        fx.run(self);
        out
    }

    pub(crate) fn create_locked(
        self: &Arc<Self>,
        st: &mut State,
        kind: Kind,
        variant: Variant,
        message: String,
        mut opts: NotifyOptions,
        fx: &mut Effects,
    ) -> Option<NotificationId> {
        if st.disposed {
            tracing::warn!(kind = kind.as_str(), "create on a disposed engine ignored");
            return None;
        }

        let priority = opts.priority.unwrap_or_default();
        let now = Instant::now();
        let exempt = kind == Kind::Alert || priority == Priority::High || variant == Variant::Error;
        if !exempt
            && let (Some(throttle), Some(last)) = (self.cfg.throttle(), st.last_create)
            && now.saturating_duration_since(last) < throttle
        {
            tracing::debug!(kind = kind.as_str(), "create throttled");
            return None;
        }

        if self.cfg.prevent_duplicates
            && kind != Kind::Alert
            && let Some(existing) = st.queue.find_duplicate(kind, &message)
        {
            tracing::debug!(id = %existing.id, "duplicate message; returning existing id");
            return Some(existing.id.clone());
        }

        let id = opts
            .id
            .take()
            .unwrap_or_else(|| NotificationId::generate(kind.as_str()));
        if st.queue.contains(id.as_str()) {
            tracing::warn!(%id, "id already active; create ignored");
            return None;
        }

        if !exempt {
            st.last_create = Some(now);
        }
        st.next_seq += 1;
        let seq = st.next_seq;
        let duration = opts.resolve_duration(kind, variant, self.cfg.default_duration);
        let animation = opts.animation.unwrap_or(self.cfg.animation_duration);

        let mut item = NotificationItem::new(id.clone(), kind, message)
            .with_variant(variant)
            .with_priority(priority)
            .with_position(opts.resolve_position(kind, self.cfg.default_position))
            .with_duration(duration)
            .with_animation(animation)
            .with_seq(seq);
        item.title = opts.title.take();
        item.data = std::mem::take(&mut opts.data);

        match st.queue.enqueue(item) {
            Enqueue::Accepted { evicted: Some(old) } => self.retire(st, old, true, fx),
            Enqueue::Accepted { evicted: None } => {}
            Enqueue::Rejected => return None,
        }
        st.callbacks.insert(id.clone(), opts.callbacks);
        st.queue
            .with_item_mut(id.as_str(), |it| it.status.advance(Status::Entering));

        if !duration.is_zero() {
            self.start_timer(st, &id, seq, duration);
        }
        let weak = Arc::downgrade(self);
        let entered = id.clone();
        self.driver.defer(animation, move || {
            if let Some(inner) = weak.upgrade() {
                inner.entered(&entered, seq);
            }
        });

        self.relayout(st);
        if let Some(item) = st.queue.get(id.as_str()) {
            fx.event(Event::new(EventKind::Created).with_item(item));
        }
        tracing::debug!(%id, kind = kind.as_str(), ?duration, "created");
        Some(id)
    }

    pub(crate) fn update_locked(
        self: &Arc<Self>,
        st: &mut State,
        id: &str,
        patch: &ItemPatch,
        fx: &mut Effects,
    ) -> bool {
        if st.disposed {
            return false;
        }
        let before = st.queue.get(id).map(|it| it.duration);
        if !st.queue.update(id, patch) {
            return false;
        }
        let Some((id, seq, active)) = st
            .queue
            .get(id)
            .map(|it| (it.id.clone(), it.seq, it.status.is_active()))
        else {
            return false;
        };

        // Only a changed duration restarts the timer; a same-value patch keeps a pause.
        if let Some(duration) = patch.duration
            && before != Some(duration)
        {
            if let Some(t) = st.timers.remove(&id) {
                t.cancel();
            }
            st.queue.with_item_mut(id.as_str(), |it| it.paused = false);
            if active && !duration.is_zero() {
                self.start_timer(st, &id, seq, duration);
            }
        }

        self.relayout(st);
        if let Some(item) = st.queue.get(id.as_str()) {
            fx.event(Event::new(EventKind::Updated).with_item(item));
        }
        true
    }

    fn start_timer(
        self: &Arc<Self>,
        st: &mut State,
        id: &NotificationId,
        seq: u64,
        duration: Duration,
    ) {
        let weak = Arc::downgrade(self);
        let expired = id.clone();
        let timer = self.driver.start(duration, move || {
            if let Some(inner) = weak.upgrade() {
                inner.expired(&expired, seq);
            }
        });
        if let Some(old) = st.timers.insert(id.clone(), timer) {
            old.cancel();
        }
    }

    fn entered(&self, id: &NotificationId, seq: u64) {
        self.with_state(|st, fx| {
            let snapshot = st.queue.with_item_mut(id.as_str(), |it| {
                (it.seq == seq && it.status.advance(Status::Visible)).then(|| it.clone())
            });
            if let Some(Some(item)) = snapshot {
                tracing::debug!(%id, "visible");
                fx.event(Event::new(EventKind::Shown).with_item(&item));
            }
        });
    }

    fn expired(self: &Arc<Self>, id: &NotificationId, seq: u64) {
        self.with_state(|st, fx| {
            if st.queue.get(id.as_str()).is_some_and(|it| it.seq == seq) {
                st.timers.remove(id);
                self.dismiss_locked(st, id.as_str(), "timeout", fx);
            }
        });
    }

    /// Starts leaving `id` and schedules its removal. `false` if not active.
    pub(crate) fn dismiss_locked(
        self: &Arc<Self>,
        st: &mut State,
        id: &str,
        reason: &'static str,
        fx: &mut Effects,
    ) -> bool {
        let Some((id, seq, hold)) = self.begin_leaving(st, id, reason, fx) else {
            return false;
        };
        self.schedule_removal(st, vec![(id, seq)], hold, fx);
        true
    }

    /// Starts leaving every active item (of `kind`, if given) under one removal.
    pub(crate) fn dismiss_all_locked(
        self: &Arc<Self>,
        st: &mut State,
        kind: Option<Kind>,
        fx: &mut Effects,
    ) -> usize {
        let ids: Vec<NotificationId> = match kind {
            Some(k) => st.queue.get_by_kind(k),
            None => st.queue.get_all(),
        }
        .into_iter()
        .filter(|it| it.status.is_active())
        .map(|it| it.id.clone())
        .collect();

        let mut batch = Batch::with_capacity(ids.len());
        let mut hold = Duration::ZERO;
        for id in ids {
            let leaving = self.begin_leaving(st, id.as_str(), "dismiss-all", fx);
            if let Some((id, seq, animation)) = leaving {
                batch.push((id, seq));
                hold = hold.max(animation);
            }
        }
        let n = batch.len();
        if n > 0 {
            tracing::debug!(count = n, ?hold, "dismissing batch");
            self.schedule_removal(st, batch, hold, fx);
        }
        n
    }

    fn begin_leaving(
        &self,
        st: &mut State,
        id: &str,
        reason: &'static str,
        fx: &mut Effects,
    ) -> Option<(NotificationId, u64, Duration)> {
        if !st.queue.get(id)?.status.is_active() {
            return None;
        }
        if let Some(t) = st.timers.remove(id) {
            t.cancel();
        }
        let item = st.queue.with_item_mut(id, |it| {
            it.status.advance(Status::Leaving);
            it.paused = false;
            it.touch();
            it.clone()
        })?;

        if let Some(cb) = st.callbacks.get_mut(id) {
            fx.call(cb.on_close.take(), &item);
        }
        if let Some(tx) = st.alerts.remove(id) {
            fx.resolve(tx, AlertOutcome::Dismissed);
        }
        fx.event(
            Event::new(EventKind::Dismissed)
                .with_item(&item)
                .with_reason(reason),
        );
        tracing::debug!(id = %item.id, reason, "leaving");
        Some((item.id, item.seq, item.animation))
    }

    fn schedule_removal(
        self: &Arc<Self>,
        st: &mut State,
        batch: Batch,
        hold: Duration,
        fx: &mut Effects,
    ) {
        if hold.is_zero() {
            self.finish_removals(st, &batch, fx);
            return;
        }
        let weak = Arc::downgrade(self);
        self.driver.defer(hold, move || {
            if let Some(inner) = weak.upgrade() {
                inner.with_state(|st, fx| inner.finish_removals(st, &batch, fx));
            }
        });
    }

    fn finish_removals(
        &self,
        st: &mut State,
        batch: &[(NotificationId, u64)],
        fx: &mut Effects,
    ) {
        let mut removed = false;
        for (id, seq) in batch {
            let leaving = st
                .queue
                .get(id.as_str())
                .is_some_and(|it| it.seq == *seq && it.status == Status::Leaving);
            if leaving && let Some(item) = st.queue.take(id.as_str()) {
                self.retire(st, item, false, fx);
                removed = true;
            }
        }
        if removed {
            self.relayout(st);
        }
    }

    /// Removes `id` right away, whatever its state.
    pub(crate) fn remove_locked(&self, st: &mut State, id: &str, fx: &mut Effects) -> bool {
        let Some(item) = st.queue.take(id) else {
            return false;
        };
        self.retire(st, item, false, fx);
        self.relayout(st);
        true
    }

    /// Final teardown of an item already taken out of the queue.
    pub(crate) fn retire(
        &self,
        st: &mut State,
        mut item: NotificationItem,
        evicted: bool,
        fx: &mut Effects,
    ) {
        if let Some(t) = st.timers.remove(&item.id) {
            t.cancel();
        }
        item.status.advance(Status::Removed);
        if let Some(tx) = st.alerts.remove(&item.id) {
            fx.resolve(tx, AlertOutcome::Dismissed);
        }
        st.heights.invalidate(item.id.as_str());

        if evicted {
            fx.event(Event::new(EventKind::Evicted).with_item(&item));
        }
        if let Some(mut cb) = st.callbacks.remove(&item.id) {
            fx.call(cb.on_destroy.take(), &item);
        }
        fx.release(item.id.clone());
        fx.event(Event::new(EventKind::Destroyed).with_item(&item));
        tracing::debug!(id = %item.id, evicted, "removed");
    }

    /// Recomputes placements and writes offsets back into the items.
    pub(crate) fn relayout(&self, st: &mut State) {
        let items: Vec<LayoutItem> = st
            .queue
            .iter()
            .map(|it| LayoutItem::from_item(it, st.heights.height(it.id.as_str())))
            .collect();
        let layout = apply_strategy(&items, st.strategy, &self.cfg.layout);
        for p in &layout.placements {
            st.queue
                .with_item_mut(p.id.as_str(), |it| it.vertical_offset = p.offset);
        }
        st.layout = layout;
    }

    /// Tears everything down; later creates are refused.
    pub(crate) fn dispose(&self) {
        let disposed_now = self.with_state(|st, fx| {
            if st.disposed {
                return false;
            }
            st.disposed = true;
            for (_, t) in st.timers.drain() {
                t.cancel();
            }
            for item in st.queue.clear() {
                if item.status.is_active()
                    && let Some(cb) = st.callbacks.get_mut(&item.id)
                {
                    fx.call(cb.on_close.take(), &item);
                }
                self.retire(st, item, false, fx);
            }
            for (_, tx) in st.alerts.drain() {
                fx.resolve(tx, AlertOutcome::Dismissed);
            }
            st.callbacks.clear();
            st.heights.clear();
            st.layout = Default::default();
            true
        });
        if !disposed_now {
            return;
        }
        self.bindings.lock().clear();
        self.pool.lock().clear(None);
        self.driver.token().cancel();
        tracing::info!("engine disposed");
    }
}
