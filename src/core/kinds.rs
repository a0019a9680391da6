//! Per-kind shorthands and the promise toast.
//!
//! ```rust,no_run
//! # async fn demo(engine: toastvisor::Engine) {
//! engine.toast().success("Saved");
//! engine.message().error("Upload failed");
//! engine.notification().info("3 new comments");
//! # }
//! ```

use std::future::Future;

use super::Engine;
use crate::item::{ItemPatch, Kind, NotificationId, NotifyOptions, Variant};
use crate::pool::Recyclable;

/// Creates items of one [`Kind`] with a chosen [`Variant`].
#[derive(Debug)]
pub struct KindApi<'a, R: Recyclable> {
    engine: &'a Engine<R>,
    kind: Kind,
}

impl<'a, R: Recyclable> KindApi<'a, R> {
    pub(crate) fn new(engine: &'a Engine<R>, kind: Kind) -> Self {
        Self { engine, kind }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Full-control create for this kind.
    pub fn with(
        &self,
        variant: Variant,
        message: impl Into<String>,
        opts: NotifyOptions,
    ) -> Option<NotificationId> {
        self.engine.create(self.kind, variant, message, opts)
    }

    pub fn show(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Default, message, NotifyOptions::default())
    }

    pub fn success(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Success, message, NotifyOptions::default())
    }

    pub fn error(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Error, message, NotifyOptions::default())
    }

    pub fn warning(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Warning, message, NotifyOptions::default())
    }

    pub fn info(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Info, message, NotifyOptions::default())
    }

    /// Loading items never expire on their own; update them when done.
    pub fn loading(&self, message: impl Into<String>) -> Option<NotificationId> {
        self.with(Variant::Loading, message, NotifyOptions::default())
    }

    /// Dismisses every active item of this kind.
    pub fn dismiss_all(&self) -> usize {
        self.engine.dismiss_all(Some(self.kind))
    }
}

/// Messages shown by [`Engine::promise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromiseLabels {
    pub loading: String,
    pub success: String,
    pub error: String,
}

impl PromiseLabels {
    pub fn new(
        loading: impl Into<String>,
        success: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

impl<R: Recyclable> Engine<R> {
    pub fn toast(&self) -> KindApi<'_, R> {
        KindApi::new(self, Kind::Toast)
    }

    pub fn message(&self) -> KindApi<'_, R> {
        KindApi::new(self, Kind::Message)
    }

    pub fn notification(&self) -> KindApi<'_, R> {
        KindApi::new(self, Kind::Notification)
    }

    /// Shows a loading toast while `fut` runs, then turns it into a success or
    /// error toast with the default lifetime. Returns `fut`'s output untouched.
    pub async fn promise<T, E, Fut>(&self, fut: Fut, labels: PromiseLabels) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let id = self.toast().loading(labels.loading);
        let out = fut.await;
        if let Some(id) = id {
            let patch = match &out {
                Ok(_) => ItemPatch::new().variant(Variant::Success).message(labels.success),
                Err(_) => ItemPatch::new().variant(Variant::Error).message(labels.error),
            };
            self.update(id.as_str(), patch.duration(self.config().default_duration));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use crate::item::Position;
    use std::time::Duration;

    fn engine() -> Engine {
        let cfg = EngineConfig {
            create_throttle: Duration::ZERO,
            ..EngineConfig::default()
        };
        Engine::builder(cfg).build().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_kind_defaults_applied() {
        let e = engine();
        let m = e.message().info("hi").unwrap();
        assert_eq!(e.get(m.as_str()).unwrap().position, Position::Top);
        let l = e.toast().loading("wait").unwrap();
        assert_eq!(e.get(l.as_str()).unwrap().duration, Duration::ZERO);
        let n = e.notification().success("done").unwrap();
        let item = e.get(n.as_str()).unwrap();
        assert_eq!(item.kind, Kind::Notification);
        assert_eq!(item.duration, Duration::from_millis(3000));
        assert!(n.as_str().starts_with("notification-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_kind_dismiss_all_only_touches_kind() {
        let e = engine();
        e.toast().show("a");
        e.toast().show("b");
        let m = e.message().show("c").unwrap();
        assert_eq!(e.toast().dismiss_all(), 2);
        assert!(e.get(m.as_str()).unwrap().status.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_promise_success_updates_toast() {
        let e = engine();
        let out: Result<u32, String> = e
            .promise(
                async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(7)
                },
                PromiseLabels::new("Saving", "Saved", "Failed"),
            )
            .await;
        assert_eq!(out, Ok(7));
        let items = e.get_all();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message, "Saved");
        assert_eq!(items[0].variant, Variant::Success);
        assert_eq!(items[0].duration, Duration::from_millis(3000));

        // The restarted timer expires it like any other toast.
        tokio::time::sleep(Duration::from_millis(3400)).await;
        assert!(e.get_all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_promise_error_keeps_error() {
        let e = engine();
        let out: Result<(), &str> = e
            .promise(async { Err("nope") }, PromiseLabels::new("Saving", "Saved", "Failed"))
            .await;
        assert_eq!(out, Err("nope"));
        assert_eq!(e.get_all()[0].variant, Variant::Error);
        assert_eq!(e.get_all()[0].message, "Failed");
    }
}
