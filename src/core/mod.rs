//! Runtime core: the engine and its lifecycle.
//!
//! The public API of this module is [`Engine`] (plus its builder, config and
//! alert types). Everything else is internal:
//! - `state`: shared `Inner`, the locked `State` and deferred `Effects`;
//! - `lifecycle`: create / update / dismiss / remove and the item state machine;
//! - `alerts`: blocking confirm / prompt / alert dialogs;
//! - `kinds`: per-kind shortcuts and promise toasts;
//! - `builder`: wiring of bus, subscribers, timers and the pool sweep.
//!
//! ```text
//!   Engine::create ──► State { queue, timers, callbacks, alerts, heights, layout }
//!          │                          │
//!          │                 TimerDriver callbacks (Weak<Inner>)
//!          ▼                          ▼
//!      Effects (after unlock): alert outcomes → callbacks → pool releases → Bus
//! ```

mod alerts;
mod builder;
mod config;
mod engine;
mod kinds;
mod lifecycle;
mod state;

pub use alerts::{AlertHandle, AlertOutcome};
pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub(crate) use config::duration_ms;
pub use engine::{Engine, EngineStats};
pub use kinds::{KindApi, PromiseLabels};
