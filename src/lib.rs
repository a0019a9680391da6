//! # toastvisor
//!
//! **Toastvisor** is an in-memory lifecycle engine for transient UI notifications
//! (toasts, messages, notification cards and alert dialogs).
//!
//! It owns everything between "show this" and "it is gone": auto-dismiss timers
//! that pause on hover, a bounded priority queue, exit holds that wait for the
//! leave animation, stacking layout per screen anchor, virtual windowing for long
//! stacks and pooling of rendering handles. Rendering itself is left to the host.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     create / update / dismiss / remove        pause / resume / click
//!                   │                                    │
//!                   ▼                                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Engine (cloneable handle)                                        │
//! │  - NotificationQueue (priority order, position / kind indices)    │
//! │  - TimerDriver → PausableTimer per timed item, enter/exit holds   │
//! │  - Layout (StackStrategy per anchor, offsets written back)        │
//! │  - HeightCache + RangeCalculator (virtual window)                 │
//! │  - ResourcePool<R> + bindings (handles recycled on removal)       │
//! └──────┬─────────────────────────────────────────────────┬──────────┘
//!        │ effects after unlock:                           │
//!        │ on_close / on_destroy, alert outcomes           │
//!        ▼                                                 ▼
//! ┌───────────────────────────────┐            ┌──────────────────────┐
//! │  Bus (broadcast channel)      │──────────► │ Engine::events()     │
//! │  capacity: bus_capacity       │            │ raw receivers        │
//! └──────────────┬────────────────┘            └──────────────────────┘
//!                ▼
//!       ┌────────────────────┐
//!       │ subscriber listener│
//!       └─────────┬──────────┘
//!                 ▼
//!           SubscriberSet (per-sub queues)
//!       ┌─────────┼─────────┐
//!       ▼         ▼         ▼
//!    worker1   worker2   workerN
//! ```
//!
//! ### Lifecycle
//! ```text
//! create ──► Pending ──► Entering ──(animation)──► Visible
//!                           │                         │
//!                           └──────┬──────────────────┘
//!              timer expiry / dismiss / dismiss_all / alert resolved
//!                                  ▼
//!                               Leaving ──(animation)──► Removed
//!
//! publish: Created, Shown, Dismissed{reason}, Evicted, Destroyed, Updated
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Engine**        | Create, update, dismiss and query notifications.              | [`Engine`], [`KindApi`]                     |
//! | **Dialogs**       | Confirm / prompt / alert resolved exactly once.               | [`AlertHandle`], [`AlertOutcome`]           |
//! | **Timers**        | Pausable countdowns on the tokio clock.                       | [`PausableTimer`], [`TimerDriver`]          |
//! | **Queue**         | Priority order with position and kind indices.                | [`NotificationQueue`]                       |
//! | **Layout**        | Stack, overlap, replace and collapse strategies.              | [`StackStrategy`], [`Layout`]               |
//! | **Windowing**     | Visible index range for long stacks.                          | [`RangeCalculator`], [`VisibleRange`]       |
//! | **Pooling**       | Per-kind reuse of rendering handles.                          | [`ResourcePool`], [`Recyclable`]            |
//! | **Subscriber API**| Hook into lifecycle events.                                   | [`Subscribe`], [`SubscriberFn`]             |
//! | **Configuration** | One serde-backed config struct.                               | [`EngineConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use toastvisor::{Engine, EngineConfig, Kind, NotifyOptions, Variant};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::new(EngineConfig::default())?;
//!
//!     let id = engine
//!         .create(Kind::Toast, Variant::Success, "Saved", NotifyOptions::new())
//!         .expect("engine accepts the first create");
//!
//!     // Hovering pauses the countdown.
//!     engine.pause_timer(id.as_str());
//!     assert!(engine.is_paused(id.as_str()));
//!     engine.resume_timer(id.as_str());
//!
//!     let _ = engine.dismiss(id.as_str());
//!     tokio::time::sleep(Duration::from_millis(350)).await;
//!     assert!(engine.get(id.as_str()).is_none());
//!
//!     engine.dispose();
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod item;
mod layout;
mod pool;
mod queue;
mod range;
mod subscribers;
mod timer;

// ---- Public re-exports ----

pub use core::{
    AlertHandle, AlertOutcome, Engine, EngineBuilder, EngineConfig, EngineStats, KindApi,
    PromiseLabels,
};
pub use error::EngineError;
pub use events::{Bus, Event, EventKind};
pub use item::{
    Callbacks, ClickFn, ItemPatch, Kind, LifecycleFn, NotificationId, NotificationItem,
    NotifyOptions, Position, Priority, Status, Variant, is_same_message,
};
pub use layout::{
    Layout, LayoutConfig, LayoutItem, MoreIndicator, Placement, StackStrategy, apply_strategy,
};
pub use pool::{HandleId, KindStats, PoolStats, Pooled, Recyclable, ResourcePool};
pub use queue::{Enqueue, NotificationQueue, QueueDebugInfo, SecondaryIndex};
pub use range::{HeightCache, RangeCalculator, RangeConfig, VisibleRange};
pub use subscribers::{Subscribe, SubscriberFn, SubscriberSet, Subscription, SubscriptionId};
pub use timer::{PausableTimer, TimerDriver};

// Optional: expose a simple built-in logger subscriber (demo/reference).
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
