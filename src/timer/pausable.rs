//! Per-item countdown with pause/resume.
//!
//! ## Rules
//! - Every call is a no-op when it does not apply (pause while paused, resume
//!   while running, anything after cancel). Nothing returns an error.
//! - Each armed countdown carries a generation; a wake-up whose generation is
//!   stale (paused/resumed/cancelled in between) does nothing.
//! - The callback is taken out under the lock and run outside it, so it fires
//!   at most once and never after `cancel`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

type Callback = Box<dyn FnOnce() + Send + 'static>;

struct TimerState {
    remaining: Duration,
    started_at: Instant,
    paused: bool,
    cancelled: bool,
    fired: bool,
    generation: u64,
    segment: CancellationToken,
    callback: Option<Callback>,
}

/// Countdown that can be paused and resumed without losing elapsed time.
///
/// Cloning yields another handle to the same countdown.
#[derive(Clone)]
pub struct PausableTimer {
    state: Arc<Mutex<TimerState>>,
    handle: Handle,
    root: CancellationToken,
}

impl PausableTimer {
    pub(crate) fn start<F>(
        handle: Handle,
        root: CancellationToken,
        duration: Duration,
        callback: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let timer = Self {
            state: Arc::new(Mutex::new(TimerState {
                remaining: duration,
                started_at: Instant::now(),
                paused: false,
                cancelled: false,
                fired: false,
                generation: 0,
                segment: root.child_token(),
                callback: Some(Box::new(callback)),
            })),
            handle,
            root,
        };
        {
            let mut st = timer.state.lock();
            timer.arm(&mut st);
        }
        timer
    }

    /// Freezes the countdown, keeping what is left.
    pub fn pause(&self) {
        let mut st = self.state.lock();
        if st.paused || st.cancelled || st.fired {
            return;
        }
        let elapsed = st.started_at.elapsed();
        st.remaining = st.remaining.saturating_sub(elapsed);
        st.paused = true;
        st.generation += 1;
        st.segment.cancel();
    }

    /// Continues a paused countdown for exactly the frozen remaining time.
    pub fn resume(&self) {
        let mut st = self.state.lock();
        if !st.paused || st.cancelled {
            return;
        }
        st.paused = false;
        self.arm(&mut st);
    }

    /// Stops the countdown for good. Idempotent.
    pub fn cancel(&self) {
        let mut st = self.state.lock();
        if st.cancelled {
            return;
        }
        st.cancelled = true;
        st.remaining = Duration::ZERO;
        st.generation += 1;
        st.segment.cancel();
        st.callback = None;
    }

    /// Time left before the callback fires.
    pub fn remaining(&self) -> Duration {
        let st = self.state.lock();
        if st.cancelled || st.fired {
            Duration::ZERO
        } else if st.paused {
            st.remaining
        } else {
            st.remaining.saturating_sub(st.started_at.elapsed())
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// True once the callback has run.
    pub fn is_fired(&self) -> bool {
        self.state.lock().fired
    }

    fn arm(&self, st: &mut TimerState) {
        st.generation += 1;
        st.started_at = Instant::now();
        st.segment = self.root.child_token();

        let generation = st.generation;
        let delay = st.remaining;
        let token = st.segment.clone();
        let state = Arc::clone(&self.state);

        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = time::sleep(delay) => {
                    let cb = {
                        let mut st = state.lock();
                        if st.generation != generation || st.paused || st.cancelled {
                            return;
                        }
                        st.fired = true;
                        st.remaining = Duration::ZERO;
                        st.callback.take()
                    };
                    if let Some(cb) = cb {
                        cb();
                    }
                }
            }
        });
    }
}

impl fmt::Debug for PausableTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state.lock();
        f.debug_struct("PausableTimer")
            .field("remaining", &st.remaining)
            .field("paused", &st.paused)
            .field("cancelled", &st.cancelled)
            .field("fired", &st.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_timer(ms: u64) -> (PausableTimer, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let t = PausableTimer::start(
            Handle::current(),
            CancellationToken::new(),
            Duration::from_millis(ms),
            move || {
                h.fetch_add(1, Ordering::SeqCst);
            },
        );
        (t, hits)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_duration() {
        let (t, hits) = counter_timer(500);
        time::sleep(Duration::from_millis(499)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(t.is_fired());
        assert_eq!(t.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_keeps_remaining() {
        let (t, hits) = counter_timer(500);
        time::sleep(Duration::from_millis(200)).await;
        t.pause();
        assert!(t.is_paused());
        assert_eq!(t.remaining(), Duration::from_millis(300));

        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(t.remaining(), Duration::from_millis(300));

        t.resume();
        time::sleep(Duration::from_millis(290)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(t.remaining(), Duration::from_millis(10));
        time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_callback() {
        let (t, hits) = counter_timer(100);
        t.cancel();
        t.cancel();
        t.resume();
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(t.is_cancelled());
        assert_eq!(t.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_calls_are_noops() {
        let (t, hits) = counter_timer(300);
        t.resume();
        time::sleep(Duration::from_millis(100)).await;
        t.pause();
        time::sleep(Duration::from_millis(100)).await;
        t.pause();
        assert_eq!(t.remaining(), Duration::from_millis(200));
        t.resume();
        t.resume();
        time::sleep(Duration::from_millis(250)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_cancel_stops_timer() {
        let root = CancellationToken::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let _t = PausableTimer::start(Handle::current(), root.clone(), Duration::from_millis(50), move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        root.cancel();
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
