//! # Example: toast_lifecycle
//!
//! Walks one engine through the common notification flows.
//!
//! Shows how to:
//! - Build an [`Engine`] with the built-in [`LogWriter`] and a closure subscriber.
//! - Create toasts, pause and resume a countdown, dismiss everything.
//! - Wrap a future in a loading → success toast with [`Engine::promise`].
//! - Open a confirm dialog and resolve it from another task.
//! - Pool rendering handles and read [`EngineStats`].
//!
//! ## Flow
//! ```text
//! create ──► Created ──(300ms)──► Shown ──(timer)──► Dismissed ──(300ms)──► Destroyed
//!                                   ▲    pause / resume
//! confirm ──► AlertHandle ◄── resolve_alert(Confirmed)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=toastvisor=debug cargo run --example toast_lifecycle
//! ```

use std::sync::Arc;
use std::time::Duration;

use toastvisor::{
    AlertOutcome, Engine, EngineConfig, EngineStats, Event, EventKind, Kind, LogWriter, NotifyOptions,
    PromiseLabels, Subscribe, SubscriberFn, Variant,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toastvisor=info")),
        )
        .init();

    let cfg = EngineConfig::from_json(r#"{ "max_items": 5, "default_duration": 1500 }"#)?;
    let shown: Arc<dyn Subscribe> = SubscriberFn::arc("shown", |ev: &Event| {
        if ev.kind == EventKind::Shown
            && let Some(item) = &ev.item
        {
            println!("[shown] {} at offset {}", item.message, item.vertical_offset);
        }
    });
    let engine = Engine::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::default()))
        .with_subscriber(shown)
        .with_resource::<String>()
        .build()?;

    // Toasts with a hover pause.
    let first = engine.toast().success("Profile saved");
    tokio::time::sleep(Duration::from_millis(60)).await;
    engine.toast().info("Sync started");
    if let Some(id) = &first {
        tokio::time::sleep(Duration::from_millis(500)).await;
        engine.pause_timer(id.as_str());
        println!("[hover] paused with {:?} left", engine.remaining(id.as_str()));
        tokio::time::sleep(Duration::from_secs(1)).await;
        engine.resume_timer(id.as_str());
    }

    // Bind a pooled view to a notification; it is recycled on removal.
    if let Some(id) = engine.notification().warning("Storage almost full") {
        let view = engine.acquire(Kind::Notification, || String::from("<card/>"));
        engine.bind(id.as_str(), view);
    }

    // Loading → success.
    let rows = engine
        .promise(
            async {
                tokio::time::sleep(Duration::from_millis(400)).await;
                Ok::<_, anyhow::Error>(42)
            },
            PromiseLabels::new("Importing...", "Import finished", "Import failed"),
        )
        .await?;
    println!("[promise] imported {rows} rows");

    // Confirm dialog answered by someone else.
    let handle = engine.confirm("Discard draft?", NotifyOptions::new().with_title("Unsaved changes"))?;
    let responder = engine.clone();
    let alert_id = handle.id().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        responder.resolve_alert(alert_id.as_str(), AlertOutcome::Confirmed);
    });
    println!("[confirm] {:?}", handle.outcome().await?);

    let stats: EngineStats = engine.stats();
    println!("[stats] {}", serde_json::to_string_pretty(&stats)?);

    println!("[dismiss-all] {}", engine.dismiss_all(None));
    tokio::time::sleep(Duration::from_millis(400)).await;
    engine.create(Kind::Message, Variant::Info, "bye", NotifyOptions::new());

    tokio::time::sleep(Duration::from_secs(2)).await;
    engine.dispose();
    // Let subscriber workers flush.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
