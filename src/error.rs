//! Error types used by the engine.
//!
//! Most engine operations never fail: unknown ids yield `false`/`None`, and a
//! disposed engine logs a warning and returns an empty result. [`EngineError`]
//! covers the few places where a caller needs a reason:
//!
//! - building outside a tokio runtime
//! - opening an alert on a disposed engine or with an id already in use
//! - waiting on an alert that can no longer resolve
//! - loading configuration from JSON
//!
//! `as_label` gives a stable snake_case tag for logs and metrics; `as_message`
//! gives a short human-readable description.

use thiserror::Error;

use crate::item::NotificationId;

/// # Errors produced by the engine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EngineError {
    /// `build()` was called with no tokio runtime in scope.
    #[error("no tokio runtime available; build the engine from within a runtime")]
    NoRuntime,

    /// The engine was disposed before the operation could start.
    #[error("engine disposed")]
    Disposed,

    /// An item with this id is already active.
    #[error("id {id} is already active")]
    DuplicateId {
        /// Offending id.
        id: NotificationId,
    },

    /// An alert's outcome channel closed without a resolution.
    #[error("alert {id} closed without an outcome")]
    AlertClosed {
        /// Alert item id.
        id: NotificationId,
    },

    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use toastvisor::EngineError;
    ///
    /// assert_eq!(EngineError::Disposed.as_label(), "engine_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::NoRuntime => "engine_no_runtime",
            EngineError::Disposed => "engine_disposed",
            EngineError::DuplicateId { .. } => "duplicate_id",
            EngineError::AlertClosed { .. } => "alert_closed",
            EngineError::Config(_) => "config_invalid",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EngineError::NoRuntime => "no tokio runtime".to_string(),
            EngineError::Disposed => "engine disposed".to_string(),
            EngineError::DuplicateId { id } => format!("duplicate id: {id}"),
            EngineError::AlertClosed { id } => format!("alert closed: id={id}"),
            EngineError::Config(e) => format!("config: {e}"),
        }
    }
}

/// Extracts a printable message from a caught panic payload.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
