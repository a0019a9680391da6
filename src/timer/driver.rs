use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::PausableTimer;

/// Spawns cancellable timed work on a captured runtime.
#[derive(Clone, Debug)]
pub struct TimerDriver {
    handle: Handle,
    token: CancellationToken,
}

impl TimerDriver {
    /// Creates a driver; `token` is the root every spawned task listens to.
    pub fn new(handle: Handle, token: CancellationToken) -> Self {
        Self { handle, token }
    }

    /// Root cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Starts a pausable countdown that runs `callback` once after `duration`.
    pub fn start<F>(&self, duration: Duration, callback: F) -> PausableTimer
    where
        F: FnOnce() + Send + 'static,
    {
        PausableTimer::start(self.handle.clone(), self.token.child_token(), duration, callback)
    }

    /// Runs `f` once after `delay` unless cancelled first.
    ///
    /// Returns the task's own token; cancelling it (or the root) drops `f` unrun.
    pub fn defer<F>(&self, delay: Duration, f: F) -> CancellationToken
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.token.child_token();
        let guard = token.clone();
        self.handle.spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = time::sleep(delay) => f(),
            }
        });
        token
    }

    /// Runs `f` every `period`, first run one period from now.
    pub fn every<F>(&self, period: Duration, mut f: F) -> CancellationToken
    where
        F: FnMut() + Send + 'static,
    {
        let token = self.token.child_token();
        let guard = token.clone();
        let period = period.max(Duration::from_millis(1));
        self.handle.spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    _ = ticker.tick() => f(),
                }
            }
        });
        token
    }
}
