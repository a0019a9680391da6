//! # Stack layout per anchor.
//!
//! [`apply_strategy`] turns the queue's items into [`Placement`]s: an offset from
//! the anchor edge plus visibility, opacity, scale and z-order. Items are grouped
//! by [`Position`](crate::Position); each group is laid out independently.
//!
//! | strategy   | offset                      | visible          | extra                     |
//! |------------|-----------------------------|------------------|---------------------------|
//! | `Stack`    | sum of earlier heights+gap  | all              |                           |
//! | `Overlap`  | `i * overlap_offset`        | all              | only newest fully opaque  |
//! | `Replace`  | 0                           | newest only      |                           |
//! | `Collapse` | `i * collapse_step`         | first N          | `+N more` indicator       |
//!
//! Layout never touches queue contents; switching strategy just recomputes.

mod strategy;

pub use strategy::{
    Layout, LayoutConfig, LayoutItem, MoreIndicator, Placement, StackStrategy, apply_strategy,
};
