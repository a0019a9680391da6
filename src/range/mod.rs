//! # Virtual windowing for long item lists.
//!
//! [`RangeCalculator::compute_visible_range`] picks the slice of items a renderer
//! must materialize for a scroll position, padded by a buffer on both sides.
//! [`HeightCache`] remembers measured heights; unmeasured items use the default.
//!
//! ```text
//!   offset 0 ┌──────────┐
//!            │ item 0   │
//!            ├──────────┤ ◄── scroll - buffer      (first kept)
//!            │   ...    │
//!   scroll ─►│ viewport │
//!            │   ...    │
//!            ├──────────┤ ◄── scroll + viewport + buffer (last kept)
//!            │ item n-1 │
//!            └──────────┘
//! ```
//!
//! ## Rules
//! - Windowing applies only when the item count exceeds the threshold.
//! - A non-empty list always yields at least one item.

mod calculator;
mod heights;

pub use calculator::{RangeCalculator, RangeConfig, VisibleRange};
pub use heights::HeightCache;
