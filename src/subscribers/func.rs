use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::Subscribe;
use crate::events::{Event, EventKind};

/// Closure-backed subscriber.
///
/// # Example
/// ```rust
/// use toastvisor::{Event, EventKind, SubscriberFn};
///
/// let sub = SubscriberFn::new("printer", |ev: &Event| println!("{:?}", ev.kind))
///     .with_filter(EventKind::Destroyed);
/// # let _ = sub;
/// ```
pub struct SubscriberFn<F> {
    name: &'static str,
    filter: Option<EventKind>,
    capacity: usize,
    f: F,
}

impl<F> SubscriberFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            filter: None,
            capacity: 1024,
            f,
        }
    }

    /// Same as [`new`](Self::new), wrapped for direct use as `Arc<dyn Subscribe>`.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Restricts delivery to events of `kind`.
    #[must_use]
    pub fn with_filter(mut self, kind: EventKind) -> Self {
        self.filter = Some(kind);
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

#[async_trait]
impl<F> Subscribe for SubscriberFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &Event) {
        if self.filter.is_none_or(|k| k == event.kind) {
            (self.f)(event);
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

impl<F> fmt::Debug for SubscriberFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberFn")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("capacity", &self.capacity)
            .finish()
    }
}
