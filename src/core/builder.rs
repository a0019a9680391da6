use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::state::{Inner, State};
use super::{Engine, EngineConfig};
use crate::error::EngineError;
use crate::events::Bus;
use crate::pool::{Recyclable, ResourcePool};
use crate::range::RangeCalculator;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::timer::TimerDriver;

/// Builder for an [`Engine`].
///
/// `R` is the pooled handle type; it defaults to `()` for hosts that do not pool.
pub struct EngineBuilder<R = ()> {
    cfg: EngineConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _resource: PhantomData<fn() -> R>,
}

impl EngineBuilder<()> {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _resource: PhantomData,
        }
    }
}

impl<R: Recyclable> EngineBuilder<R> {
    /// Subscribers attached before the first event.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Switches the pooled handle type.
    pub fn with_resource<S: Recyclable>(self) -> EngineBuilder<S> {
        EngineBuilder {
            cfg: self.cfg,
            subscribers: self.subscribers,
            _resource: PhantomData,
        }
    }

    /// Builds the engine on the current tokio runtime.
    ///
    /// Spawns:
    /// - the bus → subscriber fan-out listener
    /// - the periodic pool sweep
    ///
    /// Both stop when the engine is disposed or its last handle is dropped.
    pub fn build(self) -> Result<Engine<R>, EngineError> {
        let handle = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let token = CancellationToken::new();
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(handle.clone(), bus.clone()));
        for sub in self.subscribers {
            subs.add(sub);
        }
        spawn_listener(&handle, &bus, &subs, token.clone());

        let driver = TimerDriver::new(handle, token);
        let inner = Arc::new(Inner {
            state: Mutex::new(State::new(&self.cfg)),
            bindings: Mutex::new(Default::default()),
            pool: Mutex::new(ResourcePool::new(
                self.cfg.pool_max_per_kind,
                self.cfg.pool_idle_expiry,
            )),
            bus,
            subs,
            driver,
            range: RangeCalculator::new(self.cfg.range),
            cfg: self.cfg,
        });

        let weak = Arc::downgrade(&inner);
        inner.driver.every(inner.cfg.pool_sweep_interval, move || {
            if let Some(inner) = weak.upgrade() {
                let swept = inner.pool.lock().sweep(Instant::now());
                if swept > 0 {
                    tracing::trace!(swept, "pool sweep");
                }
            }
        });

        Ok(Engine { inner })
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains.
fn spawn_listener(handle: &Handle, bus: &Bus, subs: &Arc<SubscriberSet>, token: CancellationToken) {
    let mut rx = bus.subscribe();
    let set = Arc::clone(subs);
    handle.spawn(async move {
        loop {
            tokio::select! {
                res = rx.recv() => match res {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = token.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit_arc(Arc::new(ev));
                    }
                    break;
                }
            }
        }
    });
}
