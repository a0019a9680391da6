//! # LogWriter: events as `tracing` records
//!
//! Renders each event as one structured record at `info` (lifecycle) or
//! `warn` (subscriber trouble). Install a `tracing` subscriber to see them.
//!
//! ## Example output
//! ```text
//! INFO toastvisor: [created] id="toast-1718-1-ab12cd" kind=toast variant=success position=top-right
//! INFO toastvisor: [dismissed] id="toast-1718-1-ab12cd" reason="timeout"
//! INFO toastvisor: [destroyed] id="toast-1718-1-ab12cd"
//! WARN toastvisor: [subscriber-overflow] subscriber="history" reason="full"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let id = e.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::Created => {
                if let Some(item) = &e.item {
                    tracing::info!(
                        target: "toastvisor",
                        id,
                        kind = item.kind.as_str(),
                        variant = ?item.variant,
                        position = ?item.position,
                        "[created]"
                    );
                }
            }
            EventKind::Dismissed => {
                tracing::info!(target: "toastvisor", id, reason, "[dismissed]");
            }
            EventKind::Updated | EventKind::Shown | EventKind::Evicted | EventKind::Destroyed => {
                tracing::info!(target: "toastvisor", id, "[{}]", e.kind.as_str());
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                tracing::warn!(
                    target: "toastvisor",
                    subscriber = e.source.as_deref().unwrap_or("unknown"),
                    reason,
                    "[{}]",
                    e.kind.as_str()
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
