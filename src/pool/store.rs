use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use super::resource::Lease;
use super::{HandleId, Pooled, Recyclable};
use crate::core::duration_ms;
use crate::item::Kind;

/// In-use table shared with outstanding [`Pooled`] handles.
pub(crate) type Ledger = Mutex<HashMap<HandleId, Meta>>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Meta {
    created_at: Instant,
    last_used_at: Instant,
    use_count: u64,
}

struct Idle<R> {
    id: HandleId,
    handle: R,
    meta: Meta,
}

/// Per-kind pool figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindStats {
    pub available: usize,
    pub total_use_count: u64,
    /// Mean use count of idle handles, rounded to two decimals.
    pub avg_use_count: f64,
    /// Idle time of the longest-idle handle.
    #[serde(with = "duration_ms")]
    pub oldest_idle: Duration,
}

/// Pool-wide figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolStats {
    pub enabled: bool,
    pub max_per_kind: usize,
    pub in_use: usize,
    pub kinds: HashMap<Kind, KindStats>,
}

impl PoolStats {
    /// Idle handles of `kind` (0 when the kind was never pooled).
    pub fn available(&self, kind: Kind) -> usize {
        self.kinds.get(&kind).map_or(0, |k| k.available)
    }
}

/// Bounded per-kind pool of [`Recyclable`] handles.
pub struct ResourcePool<R> {
    available: HashMap<Kind, VecDeque<Idle<R>>>,
    in_use: Arc<Ledger>,
    max_per_kind: usize,
    idle_expiry: Duration,
    enabled: bool,
    next_id: u64,
}

impl<R: Recyclable> ResourcePool<R> {
    /// Creates an enabled pool; `max_per_kind` is clamped to at least 1.
    pub fn new(max_per_kind: usize, idle_expiry: Duration) -> Self {
        Self {
            available: HashMap::new(),
            in_use: Arc::default(),
            max_per_kind: max_per_kind.max(1),
            idle_expiry,
            enabled: true,
            next_id: 0,
        }
    }

    /// Hands out the most recently released handle of `kind`, or a new one.
    pub fn acquire<F>(&mut self, kind: Kind, creator: F) -> Pooled<R>
    where
        F: FnOnce() -> R,
    {
        let now = Instant::now();
        if self.enabled
            && let Some(mut idle) = self.available.get_mut(&kind).and_then(VecDeque::pop_back)
        {
            idle.handle.reset();
            idle.meta.last_used_at = now;
            idle.meta.use_count += 1;
            self.in_use.lock().insert(idle.id, idle.meta);
            return Pooled {
                id: idle.id,
                kind,
                handle: idle.handle,
                lease: Lease::new(idle.id, Arc::downgrade(&self.in_use)),
            };
        }

        let id = self.next_handle_id();
        self.in_use.lock().insert(
            id,
            Meta {
                created_at: now,
                last_used_at: now,
                use_count: 1,
            },
        );
        Pooled {
            id,
            kind,
            handle: creator(),
            lease: Lease::new(id, Arc::downgrade(&self.in_use)),
        }
    }

    /// Takes a handle back. Returns `false` if it was discarded instead of pooled.
    pub fn release(&mut self, pooled: Pooled<R>) -> bool {
        let now = Instant::now();
        let Pooled {
            id,
            kind,
            mut handle,
            lease,
        } = pooled;
        let meta = lease.settle().unwrap_or(Meta {
            created_at: now,
            last_used_at: now,
            use_count: 0,
        });
        if !self.enabled {
            return false;
        }

        let list = self.available.entry(kind).or_default();
        if list.len() >= self.max_per_kind {
            list.pop_front();
        }
        handle.reset();
        list.push_back(Idle {
            id,
            handle,
            meta: Meta {
                last_used_at: now,
                ..meta
            },
        });
        true
    }

    /// Pre-creates up to `count` idle handles for `kind`, staying within capacity.
    ///
    /// Returns how many were added.
    pub fn warm<F>(&mut self, kind: Kind, count: usize, mut creator: F) -> usize
    where
        F: FnMut() -> R,
    {
        if !self.enabled {
            return 0;
        }
        let current = self.available.get(&kind).map_or(0, VecDeque::len);
        let to_add = count.min(self.max_per_kind.saturating_sub(current));
        let now = Instant::now();
        for _ in 0..to_add {
            let id = self.next_handle_id();
            let idle = Idle {
                id,
                handle: creator(),
                meta: Meta {
                    created_at: now,
                    last_used_at: now,
                    use_count: 0,
                },
            };
            self.available.entry(kind).or_default().push_back(idle);
        }
        to_add
    }

    /// Drops idle handles of `kind`, or of every kind with `None`.
    pub fn clear(&mut self, kind: Option<Kind>) {
        match kind {
            Some(k) => {
                self.available.remove(&k);
            }
            None => self.available.clear(),
        }
    }

    /// Drops idle handles unused for longer than the idle expiry. Returns the count.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let expiry = self.idle_expiry;
        let mut removed = 0;
        for list in self.available.values_mut() {
            let before = list.len();
            list.retain(|idle| now.saturating_duration_since(idle.meta.last_used_at) <= expiry);
            removed += before - list.len();
        }
        removed
    }

    pub fn stats(&self, now: Instant) -> PoolStats {
        let kinds = self
            .available
            .iter()
            .map(|(kind, list)| {
                let total: u64 = list.iter().map(|i| i.meta.use_count).sum();
                let avg = if list.is_empty() {
                    0.0
                } else {
                    (total as f64 / list.len() as f64 * 100.0).round() / 100.0
                };
                let oldest_idle = list
                    .iter()
                    .map(|i| now.saturating_duration_since(i.meta.last_used_at))
                    .max()
                    .unwrap_or_default();
                (
                    *kind,
                    KindStats {
                        available: list.len(),
                        total_use_count: total,
                        avg_use_count: avg,
                        oldest_idle,
                    },
                )
            })
            .collect();
        PoolStats {
            enabled: self.enabled,
            max_per_kind: self.max_per_kind,
            in_use: self.in_use.lock().len(),
            kinds,
        }
    }

    /// Age of an in-use handle since it was first created.
    pub fn age_of(&self, id: HandleId, now: Instant) -> Option<Duration> {
        self.in_use
            .lock()
            .get(&id)
            .map(|m| now.saturating_duration_since(m.created_at))
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disables pooling and drops every idle handle.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.available.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Changes per-kind capacity (min 1), dropping the oldest idle handles over it.
    pub fn set_max_size(&mut self, max_per_kind: usize) {
        self.max_per_kind = max_per_kind.max(1);
        for list in self.available.values_mut() {
            while list.len() > self.max_per_kind {
                list.pop_front();
            }
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_per_kind
    }

    fn next_handle_id(&mut self) -> HandleId {
        self.next_id += 1;
        HandleId(self.next_id)
    }
}
