//! # Lifecycle events.
//!
//! - [`Event`] / [`EventKind`] describe what happened to which item.
//! - [`Bus`] broadcasts events to raw receivers and to the subscriber fan-out.
//!
//! Events are published after the engine has released its state lock, so a
//! handler may call back into the engine.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
