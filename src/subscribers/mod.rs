//! # Event subscribers.
//!
//! - [`Subscribe`] extension point for lifecycle consumers (history, OS bridges, metrics)
//! - [`SubscriberSet`] per-subscriber bounded queue + worker, attach/detach at runtime
//! - [`SubscriberFn`] closure adapter, optionally filtered to one [`EventKind`](crate::EventKind)
//! - [`Subscription`] handle returned on attach; `unsubscribe()` detaches
//! - [`LogWriter`] (feature `logging`) renders events through `tracing`

mod func;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use func::SubscriberFn;
pub use set::{SubscriberSet, Subscription, SubscriptionId};
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
