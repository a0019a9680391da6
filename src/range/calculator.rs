use serde::{Deserialize, Serialize};

/// Windowing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Default height of an unmeasured item.
    pub item_height: f32,
    /// Extra items kept on each side of the viewport.
    pub buffer_size: usize,
    /// Windowing kicks in above this many items.
    pub threshold: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            item_height: 60.0,
            buffer_size: 3,
            threshold: 10,
        }
    }
}

/// Half-open index range `[start, end)` plus the offset of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
    pub top_offset: f32,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Stateless range computation over a list of item heights.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeCalculator {
    cfg: RangeConfig,
}

impl RangeCalculator {
    pub fn new(cfg: RangeConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RangeConfig {
        &self.cfg
    }

    /// True when `count` items are enough to window.
    #[inline]
    pub fn is_enabled(&self, count: usize) -> bool {
        count > self.cfg.threshold
    }

    /// Items to materialize for a viewport at `scroll_offset`.
    ///
    /// Below the threshold every item is in range. Otherwise the pixel window
    /// `[scroll - buffer, scroll + viewport + buffer]` is mapped to indices and
    /// then widened by `buffer_size` items on both sides.
    pub fn compute_visible_range(
        &self,
        scroll_offset: f32,
        viewport_height: f32,
        heights: &[f32],
    ) -> VisibleRange {
        let n = heights.len();
        if n == 0 {
            return VisibleRange::default();
        }
        if !self.is_enabled(n) {
            return VisibleRange {
                start: 0,
                end: n,
                top_offset: 0.0,
            };
        }

        let buffer_height = self.cfg.item_height * self.cfg.buffer_size as f32;
        let range_start = (scroll_offset - buffer_height).max(0.0);
        let range_end = scroll_offset + viewport_height + buffer_height;

        let mut start = 0;
        let mut end = n;
        let mut offset = 0.0;
        for (i, h) in heights.iter().enumerate() {
            if offset + h < range_start {
                start = i + 1;
            }
            if offset > range_end {
                end = i;
                break;
            }
            offset += h;
        }

        // Scrolled past the end: keep the last item.
        let start = start.min(n - 1);
        let end = if start >= end { start + 1 } else { end };

        let start = start.saturating_sub(self.cfg.buffer_size);
        let end = (end + self.cfg.buffer_size).min(n);
        VisibleRange {
            start,
            end,
            top_offset: heights[..start].iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> RangeCalculator {
        RangeCalculator::new(RangeConfig::default())
    }

    #[test]
    fn test_below_threshold_everything_visible() {
        let heights = vec![60.0; 10];
        let r = calc().compute_visible_range(5000.0, 100.0, &heights);
        assert_eq!((r.start, r.end), (0, 10));
        assert!(!calc().is_enabled(10));
        assert!(calc().is_enabled(11));
    }

    #[test]
    fn test_empty_list() {
        let r = calc().compute_visible_range(0.0, 300.0, &[]);
        assert!(r.is_empty());
    }

    #[test]
    fn test_top_of_long_list() {
        let heights = vec![60.0; 100];
        let r = calc().compute_visible_range(0.0, 300.0, &heights);
        // window [0, 480] → items 0..=8 → end 9, +3 buffer
        assert_eq!(r.start, 0);
        assert_eq!(r.end, 12);
        assert_eq!(r.top_offset, 0.0);
    }

    #[test]
    fn test_middle_of_long_list() {
        let heights = vec![60.0; 100];
        let r = calc().compute_visible_range(3000.0, 300.0, &heights);
        // window [2820, 3480]: items ending before 2820 are 0..=45, first kept 46
        assert_eq!(r.start, 43);
        assert!(r.contains(50));
        assert!(r.end <= 100);
        assert_eq!(r.top_offset, 43.0 * 60.0);
    }

    #[test]
    fn test_scrolled_past_end_keeps_last_item() {
        let heights = vec![60.0; 20];
        let r = calc().compute_visible_range(1_000_000.0, 300.0, &heights);
        assert!(!r.is_empty());
        assert!(r.contains(19));
        assert_eq!(r.end, 20);
    }

    #[test]
    fn test_mixed_heights_shift_window() {
        let mut heights = vec![20.0; 30];
        heights[0] = 1000.0;
        let r = calc().compute_visible_range(1200.0, 100.0, &heights);
        // window [1020, 1480]: item 0 ends at 1000, item 1 at 1020 (not < 1020)
        assert_eq!(r.start, 0);
        assert!(r.contains(5));
    }
}
