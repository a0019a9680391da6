//! # Reusable rendering handles.
//!
//! [`ResourcePool`] recycles caller-defined handles per [`Kind`](crate::Kind) so the
//! rendering layer does not rebuild them for every notification.
//!
//! ```text
//! acquire(kind) ──► available[kind].pop_back() ──reset()──► Pooled<R>
//!                          └─ empty ──► creator() ──────────► Pooled<R>
//! release(h) ──reset()──► available[kind].push_back()   (full: drop front first)
//! sweep(now) ──► drop idle entries older than idle_expiry
//! ```
//!
//! ## Rules
//! - Per kind, at most `max_per_kind` handles sit idle.
//! - In-use handles are tracked in an explicit table keyed by [`HandleId`].
//!   A [`Pooled`] that is dropped or unwrapped strikes its own entry.
//! - When disabled, `acquire` always creates and `release` always discards.
//! - Stats are for observability only.

mod resource;
mod store;

pub use resource::{HandleId, Pooled, Recyclable};
pub use store::{KindStats, PoolStats, ResourcePool};
