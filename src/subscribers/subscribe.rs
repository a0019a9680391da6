//! # Core subscriber trait
//!
//! `Subscribe` is how code outside the engine reacts to lifecycle events. Each
//! subscriber gets its own worker fed by a bounded queue owned by
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Handlers may be slow; they never block the engine or other subscribers.
//! - Queue capacity comes from [`Subscribe::queue_capacity`]. On overflow the
//!   event is dropped for that subscriber and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use toastvisor::{Event, EventKind, Subscribe};
//!
//! struct History;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for History {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::Destroyed {
//!             // persist ev.item ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "history" }
//!     fn queue_capacity(&self) -> usize { 256 }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in logs and subscriber events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (min 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
