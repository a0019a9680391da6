use std::collections::HashMap;

use crate::item::NotificationId;

/// Measured item heights with a fallback default.
#[derive(Debug, Clone)]
pub struct HeightCache {
    heights: HashMap<NotificationId, f32>,
    default_height: f32,
}

impl HeightCache {
    pub fn new(default_height: f32) -> Self {
        Self {
            heights: HashMap::new(),
            default_height,
        }
    }

    /// Stores the first measurement for `id`; later calls are ignored until a
    /// resize or invalidation. Returns whether the value was stored.
    pub fn record(&mut self, id: &NotificationId, height: f32) -> bool {
        if self.heights.contains_key(id) {
            return false;
        }
        self.heights.insert(id.clone(), height);
        true
    }

    /// Replaces the height of `id` after a resize signal.
    pub fn resize(&mut self, id: &NotificationId, height: f32) {
        self.heights.insert(id.clone(), height);
    }

    /// Forgets `id`; it falls back to the default until measured again.
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.heights.remove(id).is_some()
    }

    pub fn height(&self, id: &str) -> f32 {
        self.heights.get(id).copied().unwrap_or(self.default_height)
    }

    pub fn is_measured(&self, id: &str) -> bool {
        self.heights.contains_key(id)
    }

    /// Heights for `ids`, in order.
    pub fn heights_for<'a, I>(&self, ids: I) -> Vec<f32>
    where
        I: IntoIterator<Item = &'a NotificationId>,
    {
        ids.into_iter().map(|id| self.height(id.as_str())).collect()
    }

    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn clear(&mut self) {
        self.heights.clear();
    }
}
