use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::item::{NotificationId, NotificationItem, Position, Priority};

/// How items sharing an anchor are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackStrategy {
    /// One slot per item.
    #[default]
    Stack,
    /// Fixed-step overlap, newest opaque on top.
    Overlap,
    /// Newest item only.
    Replace,
    /// A few shrinking cards plus a "+N more" counter.
    Collapse,
}

/// Geometry constants for layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Space between stacked items.
    pub gap: f32,
    /// Per-item step in `Overlap`.
    pub overlap_offset: f32,
    /// Per-item step in `Collapse`.
    pub collapse_step: f32,
    /// Cards rendered in `Collapse` before the counter.
    pub collapse_visible: usize,
    /// Within a priority tier, put the newest item nearest the anchor edge.
    pub newest_on_top: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 8.0,
            overlap_offset: 10.0,
            collapse_step: 2.0,
            collapse_visible: 3,
            newest_on_top: true,
        }
    }
}

/// Layout input for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub id: NotificationId,
    pub position: Position,
    pub priority: Priority,
    pub seq: u64,
    pub height: f32,
}

impl LayoutItem {
    pub fn from_item(item: &NotificationItem, height: f32) -> Self {
        Self {
            id: item.id.clone(),
            position: item.position,
            priority: item.priority,
            seq: item.seq,
            height,
        }
    }
}

/// Computed directive for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: NotificationId,
    pub position: Position,
    pub offset: f32,
    pub visible: bool,
    pub opacity: f32,
    pub scale: f32,
    pub z_index: i32,
}

/// Aggregate counter standing in for hidden items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoreIndicator {
    pub position: Position,
    pub hidden: usize,
    pub offset: f32,
}

impl MoreIndicator {
    pub fn label(&self) -> String {
        format!("+{} more", self.hidden)
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub strategy: StackStrategy,
    pub placements: Vec<Placement>,
    pub indicators: Vec<MoreIndicator>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id.as_str() == id)
    }

    pub fn at(&self, position: Position) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.position == position)
    }

    pub fn indicator(&self, position: Position) -> Option<&MoreIndicator> {
        self.indicators.iter().find(|i| i.position == position)
    }
}

/// Lays out `items` with `strategy`. Input order does not matter.
pub fn apply_strategy(items: &[LayoutItem], strategy: StackStrategy, cfg: &LayoutConfig) -> Layout {
    let mut groups: HashMap<Position, Vec<&LayoutItem>> = HashMap::new();
    for it in items {
        groups.entry(it.position).or_default().push(it);
    }

    let mut layout = Layout {
        strategy,
        ..Layout::default()
    };

    for position in Position::ALL {
        let Some(mut group) = groups.remove(&position) else {
            continue;
        };
        group.sort_by(|a, b| {
            b.priority.weight().cmp(&a.priority.weight()).then_with(|| {
                if cfg.newest_on_top {
                    b.seq.cmp(&a.seq)
                } else {
                    a.seq.cmp(&b.seq)
                }
            })
        });

        match strategy {
            StackStrategy::Stack => stack(&group, cfg, &mut layout),
            StackStrategy::Overlap => overlap(&group, cfg, &mut layout),
            StackStrategy::Replace => replace(&group, &mut layout),
            StackStrategy::Collapse => collapse(&group, cfg, &mut layout),
        }
    }
    layout
}

fn placement(
    it: &LayoutItem,
    offset: f32,
    visible: bool,
    opacity: f32,
    scale: f32,
    z_index: i32,
) -> Placement {
    Placement {
        id: it.id.clone(),
        position: it.position,
        offset,
        visible,
        opacity,
        scale,
        z_index,
    }
}

fn stack(group: &[&LayoutItem], cfg: &LayoutConfig, out: &mut Layout) {
    let n = group.len() as i32;
    let mut offset = 0.0;
    for (i, it) in group.iter().enumerate() {
        out.placements.push(placement(it, offset, true, 1.0, 1.0, n - i as i32));
        offset += it.height + cfg.gap;
    }
}

fn overlap(group: &[&LayoutItem], cfg: &LayoutConfig, out: &mut Layout) {
    let newest = group.iter().map(|it| it.seq).max();
    let mut by_age: Vec<u64> = group.iter().map(|it| it.seq).collect();
    by_age.sort_unstable();

    for (i, it) in group.iter().enumerate() {
        let opacity = if Some(it.seq) == newest { 1.0 } else { 0.7 };
        let scale = (1.0 - 0.02 * i as f32).max(0.0);
        let z = by_age.binary_search(&it.seq).map_or(0, |r| r as i32 + 1);
        out.placements
            .push(placement(it, i as f32 * cfg.overlap_offset, true, opacity, scale, z));
    }
}

fn replace(group: &[&LayoutItem], out: &mut Layout) {
    let newest = group.iter().map(|it| it.seq).max();
    for it in group {
        let shown = Some(it.seq) == newest;
        let opacity = if shown { 1.0 } else { 0.0 };
        out.placements
            .push(placement(it, 0.0, shown, opacity, 1.0, i32::from(shown)));
    }
}

fn collapse(group: &[&LayoutItem], cfg: &LayoutConfig, out: &mut Layout) {
    let max_visible = cfg.collapse_visible.max(1);
    for (i, it) in group.iter().enumerate() {
        if i < max_visible {
            let f = i as f32;
            out.placements.push(placement(
                it,
                f * cfg.collapse_step,
                true,
                (1.0 - 0.2 * f).max(0.0),
                (1.0 - 0.05 * f).max(0.0),
                (max_visible - i) as i32,
            ));
        } else {
            out.placements.push(placement(it, 0.0, false, 0.0, 1.0, 0));
        }
    }

    if group.len() > max_visible
        && let Some(first) = group.first()
    {
        let shown = max_visible.min(group.len()) as f32;
        out.indicators.push(MoreIndicator {
            position: first.position,
            hidden: group.len() - max_visible,
            offset: first.height + cfg.gap + (shown - 1.0) * cfg.collapse_step,
        });
    }
}
