//! # Notification data model.
//!
//! [`NotificationItem`] is the central entity the engine tracks. It is plain data:
//! cloneable, serializable and free of callbacks, so snapshots can travel on the
//! event bus. Callbacks live next to the item in the engine, keyed by [`NotificationId`].
//!
//! - [`NotificationId`] unique identifier among active items
//! - [`Kind`], [`Variant`], [`Priority`], [`Position`] classification and placement
//! - [`Status`] strictly ordered lifecycle state
//! - [`NotifyOptions`] per-call options for creation
//! - [`ItemPatch`] partial update applied by `update`

mod id;
mod kinds;
mod notification;
mod options;

pub use id::NotificationId;
pub use kinds::{Kind, Position, Priority, Status, Variant};
pub use notification::{NotificationItem, is_same_message};
pub use options::{Callbacks, ClickFn, ItemPatch, LifecycleFn, NotifyOptions};
