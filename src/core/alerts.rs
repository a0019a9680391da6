//! # Blocking-style dialogs as single-resolution futures.
//!
//! `confirm`, `prompt` and `alert` create an [`Kind::Alert`] item and hand back an
//! [`AlertHandle`]. The handle resolves exactly once, on whichever terminal
//! transition happens first:
//!
//! ```text
//! resolve_alert(id, Confirmed | Submitted(v) | Cancelled | Denied) ──┐
//! close_alert() / dismiss(id) / dismiss_all / eviction ─► Dismissed ├──► AlertHandle::outcome()
//! remove(id) / dispose() ───────────────────────────────► Dismissed ──┘
//! ```
//!
//! The sender lives in an id-keyed table; taking it out of the table is the
//! "resolved" flag, so no second resolution can happen.

use serde::Serialize;
use serde_json::json;
use tokio::sync::oneshot;

use super::Engine;
use crate::error::EngineError;
use crate::item::{Kind, NotificationId, NotifyOptions, Variant};
use crate::pool::Recyclable;

/// Terminal outcome of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "kebab-case")]
pub enum AlertOutcome {
    /// Confirm button.
    Confirmed,
    /// Prompt submitted with this value.
    Submitted(String),
    /// Cancel button.
    Cancelled,
    /// Deny button, distinct from cancelling.
    Denied,
    /// Closed by anything else (dismiss, eviction, dispose).
    Dismissed,
}

/// Pending result of an alert.
#[derive(Debug)]
pub struct AlertHandle {
    id: NotificationId,
    rx: oneshot::Receiver<AlertOutcome>,
}

impl AlertHandle {
    /// Id of the alert item.
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Waits for the outcome.
    pub async fn outcome(self) -> Result<AlertOutcome, EngineError> {
        let Self { id, rx } = self;
        rx.await.map_err(|_| EngineError::AlertClosed { id })
    }
}

impl<R: Recyclable> Engine<R> {
    /// Opens a confirm dialog.
    pub fn confirm(
        &self,
        message: impl Into<String>,
        opts: NotifyOptions,
    ) -> Result<AlertHandle, EngineError> {
        self.open_alert(Variant::Warning, message.into(), json!({ "mode": "confirm" }), opts)
    }

    /// Opens a prompt with an initial value.
    pub fn prompt(
        &self,
        message: impl Into<String>,
        default_value: impl Into<String>,
        opts: NotifyOptions,
    ) -> Result<AlertHandle, EngineError> {
        let data = json!({ "mode": "prompt", "default": default_value.into() });
        self.open_alert(Variant::Info, message.into(), data, opts)
    }

    /// Opens an informational alert with a single acknowledge button.
    pub fn alert(
        &self,
        message: impl Into<String>,
        opts: NotifyOptions,
    ) -> Result<AlertHandle, EngineError> {
        self.open_alert(Variant::Info, message.into(), json!({ "mode": "alert" }), opts)
    }

    /// Settles an open alert and starts dismissing it. `false` if none is pending.
    pub fn resolve_alert(&self, id: &str, outcome: AlertOutcome) -> bool {
        let inner = &self.inner;
        inner.with_state(|st, fx| {
            let Some(tx) = st.alerts.remove(id) else {
                return false;
            };
            tracing::debug!(id, ?outcome, "alert resolved");
            fx.resolve(tx, outcome);
            inner.dismiss_locked(st, id, "resolved", fx);
            true
        })
    }

    /// Closes the most recently opened alert still on screen, resolving it as
    /// [`AlertOutcome::Dismissed`]. `false` if no alert is active.
    pub fn close_alert(&self) -> bool {
        let inner = &self.inner;
        inner.with_state(|st, fx| {
            let Some(id) = st
                .queue
                .get_by_kind(Kind::Alert)
                .into_iter()
                .rev()
                .find(|it| it.status.is_active())
                .map(|it| it.id.clone())
            else {
                return false;
            };
            inner.dismiss_locked(st, id.as_str(), "close", fx)
        })
    }

    fn open_alert(
        &self,
        variant: Variant,
        message: String,
        data: serde_json::Value,
        mut opts: NotifyOptions,
    ) -> Result<AlertHandle, EngineError> {
        if opts.data.is_null() {
            opts.data = data;
        }
        let (tx, rx) = oneshot::channel();
        let inner = &self.inner;
        let id = inner.with_state(|st, fx| {
            if st.disposed {
                return Err(EngineError::Disposed);
            }
            if let Some(id) = opts.id.as_ref().filter(|id| st.queue.contains(id.as_str())) {
                return Err(EngineError::DuplicateId { id: id.clone() });
            }
            let id = inner
                .create_locked(st, Kind::Alert, variant, message, opts, fx)
                .ok_or(EngineError::Disposed)?;
            st.alerts.insert(id.clone(), tx);
            Ok(id)
        })?;
        Ok(AlertHandle { id, rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use crate::item::Status;
    use std::time::Duration;

    fn engine() -> Engine {
        Engine::builder(EngineConfig::default()).build().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_resolves_once() {
        let e = engine();
        let h = e.confirm("Delete?", NotifyOptions::new()).unwrap();
        let id = h.id().clone();
        let item = e.get(id.as_str()).unwrap();
        assert_eq!(item.kind, Kind::Alert);
        assert_eq!(item.duration, Duration::ZERO);
        assert_eq!(item.data["mode"], "confirm");

        assert!(e.resolve_alert(id.as_str(), AlertOutcome::Confirmed));
        assert!(!e.resolve_alert(id.as_str(), AlertOutcome::Cancelled));
        assert_eq!(h.outcome().await.unwrap(), AlertOutcome::Confirmed);
        assert_eq!(e.get(id.as_str()).unwrap().status, Status::Leaving);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_submits_value() {
        let e = engine();
        let h = e.prompt("Name?", "anon", NotifyOptions::new()).unwrap();
        assert_eq!(e.get(h.id().as_str()).unwrap().data["default"], "anon");
        e.resolve_alert(h.id().as_str(), AlertOutcome::Submitted("ada".into()));
        assert_eq!(h.outcome().await.unwrap(), AlertOutcome::Submitted("ada".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_dismiss_resolves_dismissed() {
        let e = engine();
        let h = e.alert("Heads up", NotifyOptions::new()).unwrap();
        assert!(e.dismiss(h.id().as_str()));
        assert_eq!(h.outcome().await.unwrap(), AlertOutcome::Dismissed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_resolves_pending_alerts() {
        let e = engine();
        let a = e.confirm("one", NotifyOptions::new()).unwrap();
        let b = e.confirm("two", NotifyOptions::new()).unwrap();
        e.dispose();
        assert_eq!(a.outcome().await.unwrap(), AlertOutcome::Dismissed);
        assert_eq!(b.outcome().await.unwrap(), AlertOutcome::Dismissed);
        assert!(matches!(
            e.confirm("late", NotifyOptions::new()),
            Err(EngineError::Disposed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_alert_id_rejected() {
        let e = engine();
        let _a = e.alert("x", NotifyOptions::new().with_id("dlg")).unwrap();
        let err = e.alert("y", NotifyOptions::new().with_id("dlg")).unwrap_err();
        assert_eq!(err.as_label(), "duplicate_id");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deny_resolves_denied() {
        let e = engine();
        let h = e.confirm("Keep changes?", NotifyOptions::new()).unwrap();
        assert!(e.resolve_alert(h.id().as_str(), AlertOutcome::Denied));
        assert_eq!(h.outcome().await.unwrap(), AlertOutcome::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_alert_targets_latest_open_alert() {
        let e = engine();
        assert!(!e.close_alert());
        let first = e.confirm("one", NotifyOptions::new()).unwrap();
        let second = e.alert("two", NotifyOptions::new()).unwrap();
        let first_id = first.id().clone();

        assert!(e.close_alert());
        assert_eq!(second.outcome().await.unwrap(), AlertOutcome::Dismissed);
        assert_eq!(e.get(first_id.as_str()).unwrap().status, Status::Entering);

        // The leaving alert is skipped; the next call reaches the earlier one.
        assert!(e.close_alert());
        assert_eq!(first.outcome().await.unwrap(), AlertOutcome::Dismissed);
        assert!(!e.close_alert());
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let v = serde_json::to_value(AlertOutcome::Submitted("x".into())).unwrap();
        assert_eq!(v["outcome"], "submitted");
        assert_eq!(v["value"], "x");
        let v = serde_json::to_value(AlertOutcome::Denied).unwrap();
        assert_eq!(v["outcome"], "denied");
    }
}
