use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{Kind, NotificationId, NotificationItem, Position, Priority, Variant};

/// Click handler; may fire many times.
pub type ClickFn = Arc<dyn Fn(&NotificationItem) + Send + Sync + 'static>;

/// Close/destroy handler; fires at most once.
pub type LifecycleFn = Box<dyn FnOnce(&NotificationItem) + Send + 'static>;

/// Callbacks attached to one item.
///
/// `on_close` fires when the item starts leaving, `on_destroy` when it is removed.
/// Both are taken out on first use so they cannot run twice.
#[derive(Default)]
pub struct Callbacks {
    pub on_click: Option<ClickFn>,
    pub on_close: Option<LifecycleFn>,
    pub on_destroy: Option<LifecycleFn>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_click", &self.on_click.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_destroy", &self.on_destroy.is_some())
            .finish()
    }
}

/// Options for a single `create` call.
///
/// Every field left as `None` falls back to the engine configuration or the
/// kind's defaults:
///
/// | option     | fallback                                                       |
/// |------------|----------------------------------------------------------------|
/// | `id`       | generated `{kind}-{millis}-{n}-{seed}`                          |
/// | `priority` | `Normal`                                                       |
/// | `position` | `Top` for messages, `Center` for alerts, else config default   |
/// | `duration` | `0` for alerts and `Loading`, else config default              |
/// | `animation`| config `animation_duration`                                     |
#[derive(Default)]
pub struct NotifyOptions {
    pub id: Option<NotificationId>,
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub position: Option<Position>,
    pub duration: Option<Duration>,
    pub animation: Option<Duration>,
    pub data: serde_json::Value,
    pub callbacks: Callbacks,
}

impl NotifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Enter/exit animation hold for this item.
    #[must_use]
    pub fn with_animation(mut self, animation: Duration) -> Self {
        self.animation = Some(animation);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&NotificationItem) + Send + Sync + 'static,
    {
        self.callbacks.on_click = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&NotificationItem) + Send + 'static,
    {
        self.callbacks.on_close = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_destroy<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&NotificationItem) + Send + 'static,
    {
        self.callbacks.on_destroy = Some(Box::new(f));
        self
    }

    /// Position after applying kind defaults.
    pub(crate) fn resolve_position(&self, kind: Kind, fallback: Position) -> Position {
        self.position.unwrap_or(match kind {
            Kind::Message => Position::Top,
            Kind::Alert => Position::Center,
            _ => fallback,
        })
    }

    /// Duration after applying kind and variant defaults.
    pub(crate) fn resolve_duration(
        &self,
        kind: Kind,
        variant: Variant,
        fallback: Duration,
    ) -> Duration {
        self.duration.unwrap_or(match (kind, variant) {
            (Kind::Alert, _) | (_, Variant::Loading) => Duration::ZERO,
            _ => fallback,
        })
    }
}

impl fmt::Debug for NotifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyOptions")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("priority", &self.priority)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("animation", &self.animation)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

/// Partial update for an existing item. `None` leaves a field untouched.
///
/// Changing `duration` restarts the item's timer; other fields never affect timing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub message: Option<String>,
    pub title: Option<String>,
    pub kind: Option<Kind>,
    pub variant: Option<Variant>,
    pub priority: Option<Priority>,
    pub position: Option<Position>,
    pub duration: Option<Duration>,
    pub data: Option<serde_json::Value>,
}

impl ItemPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Writes the non-indexed fields into `item`.
    ///
    /// `kind`, `position` and `priority` are left to the queue, which owns the
    /// indices and ordering built on them.
    pub(crate) fn apply_plain(&self, item: &mut NotificationItem) {
        if let Some(m) = &self.message {
            item.message = m.clone();
        }
        if let Some(t) = &self.title {
            item.title = Some(t.clone());
        }
        if let Some(v) = self.variant {
            item.variant = v;
        }
        if let Some(d) = self.duration
            && d != item.duration
        {
            item.duration = d;
            item.remaining = d;
        }
        if let Some(data) = &self.data {
            item.data = data.clone();
        }
        item.touch();
    }
}
