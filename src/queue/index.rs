use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use super::store::Rank;

/// Groups queue ranks under a key; empty buckets are dropped.
#[derive(Debug, Clone)]
pub struct SecondaryIndex<K> {
    buckets: HashMap<K, BTreeSet<Rank>>,
}

impl<K: Copy + Eq + Hash> SecondaryIndex<K> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, rank: Rank) {
        self.buckets.entry(key).or_default().insert(rank);
    }

    pub(crate) fn remove(&mut self, key: K, rank: &Rank) {
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.remove(rank);
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    /// Ranks under `key`, in queue order.
    pub(crate) fn ranks(&self, key: K) -> impl Iterator<Item = &Rank> {
        self.buckets.get(&key).into_iter().flatten()
    }

    /// Number of entries under `key`.
    pub fn count(&self, key: K) -> usize {
        self.buckets.get(&key).map_or(0, BTreeSet::len)
    }

    /// Non-empty buckets with their sizes.
    pub fn counts(&self) -> HashMap<K, usize> {
        self.buckets.iter().map(|(k, b)| (*k, b.len())).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for SecondaryIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    #[test]
    fn test_empty_bucket_is_dropped() {
        let mut idx = SecondaryIndex::new();
        let r = (Reverse(2), 1);
        idx.insert("a", r);
        assert_eq!(idx.count("a"), 1);
        idx.remove("a", &r);
        assert_eq!(idx.count("a"), 0);
        assert!(idx.is_empty());
    }

    #[test]
    fn test_ranks_iterate_in_order() {
        let mut idx = SecondaryIndex::new();
        idx.insert(1u8, (Reverse(1), 5));
        idx.insert(1u8, (Reverse(3), 9));
        idx.insert(1u8, (Reverse(2), 2));
        let got: Vec<_> = idx.ranks(1).copied().collect();
        assert_eq!(got, vec![(Reverse(3), 9), (Reverse(2), 2), (Reverse(1), 5)]);
    }
}
