use serde::{Deserialize, Serialize};

/// Notification category; drives default placement and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Toast,
    Message,
    Notification,
    Alert,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 4] = [Kind::Toast, Kind::Message, Kind::Notification, Kind::Alert];

    /// Stable lowercase label, also used as the id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Toast => "toast",
            Kind::Message => "message",
            Kind::Notification => "notification",
            Kind::Alert => "alert",
        }
    }
}

/// Semantic severity/style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Success,
    Error,
    Warning,
    Info,
    Loading,
    #[default]
    Default,
}

/// Ordering tier inside the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Numeric weight; higher sorts first.
    #[inline]
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Normal => 2,
            Priority::Low => 1,
        }
    }
}

/// One of the nine screen anchors items stack at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Top,
    TopLeft,
    #[default]
    TopRight,
    TopCenter,
    Bottom,
    BottomLeft,
    BottomRight,
    BottomCenter,
    Center,
}

impl Position {
    /// Every anchor, in declaration order.
    pub const ALL: [Position; 9] = [
        Position::Top,
        Position::TopLeft,
        Position::TopRight,
        Position::TopCenter,
        Position::Bottom,
        Position::BottomLeft,
        Position::BottomRight,
        Position::BottomCenter,
        Position::Center,
    ];

    /// True for anchors that grow downward from the top edge.
    pub fn is_top(self) -> bool {
        matches!(
            self,
            Position::Top | Position::TopLeft | Position::TopRight | Position::TopCenter
        )
    }
}

/// Lifecycle state of an item.
///
/// ```text
/// Pending ──► Entering ──► Visible ──► Leaving ──► Removed
///    └───────────────────────────────────────────────▲
/// ```
///
/// Transitions only move forward; `Pending → Removed` covers immediate cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    Entering,
    Visible,
    Leaving,
    Removed,
}

impl Status {
    /// Items in these states are counted for deduplication and can be dismissed.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Status::Pending | Status::Entering | Status::Visible)
    }

    /// Moves to `next` if that is a forward transition. Returns whether it moved.
    pub fn advance(&mut self, next: Status) -> bool {
        if next > *self {
            *self = next;
            true
        } else {
            false
        }
    }
}
