//! # Timers: pausable countdowns and deferred work.
//!
//! [`TimerDriver`] owns the runtime handle and the engine's root cancellation
//! token. Everything the engine schedules goes through it:
//!
//! ```text
//! TimerDriver ──start()──► PausableTimer   (per-item countdown, pause/resume)
//!      ├──────defer()───► one-shot task     (enter transition, animation hold)
//!      └──────every()───► periodic task     (pool sweep)
//!             │
//!             └── every task: select! { sleep => run, token.cancelled() => drop }
//! ```
//!
//! Cancelling the root token (engine dispose) stops all of them at once.

mod driver;
mod pausable;

pub use driver::TimerDriver;
pub use pausable::PausableTimer;
