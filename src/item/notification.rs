use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use super::{Kind, NotificationId, Position, Priority, Status, Variant};
use crate::core::duration_ms;

/// A single notification tracked by the engine.
///
/// ## Timing fields
/// - `duration`: configured lifetime (`0` = never auto-expires)
/// - `remaining`: frozen remaining time, only meaningful while `paused`
///
/// While running, the live remaining time is owned by the item's timer and
/// read through `Engine::remaining`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub kind: Kind,
    pub variant: Variant,
    pub priority: Priority,
    pub position: Position,

    /// Offset from the anchor edge, written by the layout pass.
    pub vertical_offset: f32,

    #[serde(with = "duration_ms")]
    pub duration: Duration,
    #[serde(with = "duration_ms")]
    pub remaining: Duration,
    pub paused: bool,

    /// Enter/exit animation hold for this item.
    #[serde(with = "duration_ms")]
    pub animation: Duration,

    pub status: Status,

    pub message: String,
    pub title: Option<String>,

    /// Opaque caller data.
    #[serde(default)]
    pub data: serde_json::Value,

    pub created_at: SystemTime,
    pub updated_at: SystemTime,

    /// Insertion stamp; strictly increasing per engine.
    pub seq: u64,
}

impl NotificationItem {
    /// Creates a pending item with default classification and no timeout.
    pub fn new(id: NotificationId, kind: Kind, message: impl Into<String>) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            kind,
            variant: Variant::Default,
            priority: Priority::Normal,
            position: Position::default(),
            vertical_offset: 0.0,
            duration: Duration::ZERO,
            remaining: Duration::ZERO,
            paused: false,
            animation: Duration::ZERO,
            status: Status::Pending,
            message: message.into(),
            title: None,
            data: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
            seq: 0,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self.remaining = duration;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: Duration) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    /// True if the item expires on its own.
    #[inline]
    pub fn is_timed(&self) -> bool {
        !self.duration.is_zero()
    }

    /// Stamps `updated_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}

/// Case- and surrounding-whitespace-insensitive message equality.
///
/// Empty messages never match.
pub fn is_same_message(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
