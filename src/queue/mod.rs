//! # Ordered store of active items.
//!
//! [`NotificationQueue`] owns every active [`NotificationItem`](crate::NotificationItem).
//! Items are ordered by priority weight (high before normal before low) and,
//! within a tier, by insertion. Two secondary indices group ids by
//! [`Position`](crate::Position) and by [`Kind`](crate::Kind).
//!
//! ```text
//!            items: id ─► entry{item, rank}
//!                          │
//! order: rank ─► id ◄──────┘        rank = (Reverse(weight), stamp)
//! by_position: position ─► {rank}
//! by_kind:     kind     ─► {rank}
//! ```
//!
//! ## Rules
//! - Ids are unique; enqueueing a present id is rejected.
//! - With a capacity set, a full queue evicts its front item (FIFO) before
//!   admitting the new one, whatever the priorities involved.
//! - Indices are updated on every insert/remove/update; an update touching an
//!   indexed field removes the old index entry before writing the field.
//! - Unknown ids yield `false`/`None`, never a panic.

mod index;
mod store;

pub use index::SecondaryIndex;
pub use store::{Enqueue, NotificationQueue, QueueDebugInfo};
