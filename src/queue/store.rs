use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::SecondaryIndex;
use crate::item::{ItemPatch, Kind, NotificationId, NotificationItem, Position, is_same_message};

/// Sort key: higher weight first, then insertion stamp.
pub(crate) type Rank = (Reverse<u8>, u64);

#[derive(Debug, Clone)]
struct Entry {
    item: NotificationItem,
    rank: Rank,
}

/// Outcome of [`NotificationQueue::enqueue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Enqueue {
    /// Item admitted; `evicted` holds the front item pushed out by the capacity cap.
    Accepted { evicted: Option<NotificationItem> },
    /// An item with the same id is already queued.
    Rejected,
}

impl Enqueue {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Enqueue::Accepted { .. })
    }
}

/// Snapshot of queue occupancy for diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueDebugInfo {
    pub len: usize,
    pub max_size: usize,
    pub by_position: HashMap<Position, usize>,
    pub by_kind: HashMap<Kind, usize>,
}

/// Priority-ordered item store with position and kind indices.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    items: HashMap<NotificationId, Entry>,
    order: BTreeMap<Rank, NotificationId>,
    by_position: SecondaryIndex<Position>,
    by_kind: SecondaryIndex<Kind>,
    max_size: usize,
    next_stamp: u64,
}

impl NotificationQueue {
    /// Creates a queue; `max_size = 0` means unbounded.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    /// Inserts `item` behind every queued item of equal or higher priority.
    ///
    /// When full, the front item is evicted first, whatever its priority.
    pub fn enqueue(&mut self, item: NotificationItem) -> Enqueue {
        if self.items.contains_key(&item.id) {
            return Enqueue::Rejected;
        }
        let evicted = if self.max_size > 0 && self.items.len() >= self.max_size {
            self.dequeue()
        } else {
            None
        };
        self.insert(item);
        Enqueue::Accepted { evicted }
    }

    /// Removes and returns the front item.
    pub fn dequeue(&mut self) -> Option<NotificationItem> {
        let id = self.order.values().next()?.clone();
        self.take(id.as_str())
    }

    /// Removes `id`; `false` if it was not queued.
    pub fn remove(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Removes `id` and hands the item back.
    pub fn take(&mut self, id: &str) -> Option<NotificationItem> {
        let entry = self.items.remove(id)?;
        self.order.remove(&entry.rank);
        self.by_position.remove(entry.item.position, &entry.rank);
        self.by_kind.remove(entry.item.kind, &entry.rank);
        Some(entry.item)
    }

    pub fn get(&self, id: &str) -> Option<&NotificationItem> {
        self.items.get(id).map(|e| &e.item)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Applies `patch` to `id`; `false` if it was not queued.
    ///
    /// A priority change moves the item to the back of its new tier.
    pub fn update(&mut self, id: &str, patch: &ItemPatch) -> bool {
        let Some(entry) = self.items.get_mut(id) else {
            return false;
        };

        if let Some(kind) = patch.kind.filter(|k| *k != entry.item.kind) {
            self.by_kind.remove(entry.item.kind, &entry.rank);
            entry.item.kind = kind;
            self.by_kind.insert(kind, entry.rank);
        }
        if let Some(pos) = patch.position.filter(|p| *p != entry.item.position) {
            self.by_position.remove(entry.item.position, &entry.rank);
            entry.item.position = pos;
            self.by_position.insert(pos, entry.rank);
        }
        patch.apply_plain(&mut entry.item);

        if let Some(priority) = patch.priority.filter(|p| *p != entry.item.priority) {
            let Some(mut item) = self.take(id) else {
                return false;
            };
            item.priority = priority;
            self.insert(item);
        }
        true
    }

    /// Mutates fields the queue does not index or order by.
    ///
    /// Changing `id`, `kind`, `position` or `priority` inside `f` would corrupt
    /// the indices; use [`update`](Self::update) for those.
    pub(crate) fn with_item_mut<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut NotificationItem) -> R,
    ) -> Option<R> {
        let entry = self.items.get_mut(id)?;
        let before = (entry.item.kind, entry.item.position, entry.item.priority);
        let out = f(&mut entry.item);
        debug_assert_eq!(
            before,
            (entry.item.kind, entry.item.position, entry.item.priority),
            "indexed field changed through with_item_mut"
        );
        Some(out)
    }

    /// Items in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationItem> {
        self.order.values().filter_map(|id| self.get(id.as_str()))
    }

    pub fn get_all(&self) -> Vec<&NotificationItem> {
        self.iter().collect()
    }

    /// Items at `position`, in queue order.
    pub fn get_by_position(&self, position: Position) -> Vec<&NotificationItem> {
        self.resolve(self.by_position.ranks(position))
    }

    /// Items of `kind`, in queue order.
    pub fn get_by_kind(&self, kind: Kind) -> Vec<&NotificationItem> {
        self.resolve(self.by_kind.ranks(kind))
    }

    /// First active item of `kind` whose message matches `message`.
    pub fn find_duplicate(&self, kind: Kind, message: &str) -> Option<&NotificationItem> {
        self.get_by_kind(kind)
            .into_iter()
            .find(|it| it.status.is_active() && is_same_message(&it.message, message))
    }

    pub fn has_duplicate(&self, kind: Kind, message: &str) -> bool {
        self.find_duplicate(kind, message).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drops every item and index entry.
    pub fn clear(&mut self) -> Vec<NotificationItem> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut items = std::mem::take(&mut self.items);
        for id in std::mem::take(&mut self.order).into_values() {
            if let Some(e) = items.remove(&id) {
                out.push(e.item);
            }
        }
        self.by_position.clear();
        self.by_kind.clear();
        out
    }

    /// Changes the capacity and trims from the front; returns what was trimmed.
    pub fn set_max_size(&mut self, max_size: usize) -> Vec<NotificationItem> {
        self.max_size = max_size;
        let mut trimmed = Vec::new();
        if max_size > 0 {
            while self.items.len() > max_size {
                match self.dequeue() {
                    Some(it) => trimmed.push(it),
                    None => break,
                }
            }
        }
        trimmed
    }

    pub fn debug_info(&self) -> QueueDebugInfo {
        QueueDebugInfo {
            len: self.items.len(),
            max_size: self.max_size,
            by_position: self.by_position.counts(),
            by_kind: self.by_kind.counts(),
        }
    }

    fn insert(&mut self, item: NotificationItem) {
        self.next_stamp += 1;
        let rank = (Reverse(item.priority.weight()), self.next_stamp);
        self.order.insert(rank, item.id.clone());
        self.by_position.insert(item.position, rank);
        self.by_kind.insert(item.kind, rank);
        self.items.insert(item.id.clone(), Entry { item, rank });
    }

    fn resolve<'a>(&'a self, ranks: impl Iterator<Item = &'a Rank>) -> Vec<&'a NotificationItem> {
        ranks
            .filter_map(|r| self.order.get(r))
            .filter_map(|id| self.get(id.as_str()))
            .collect()
    }
}
