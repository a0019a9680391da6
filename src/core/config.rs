//! # Engine configuration.
//!
//! [`EngineConfig`] holds every tunable of the engine. All fields are public and
//! defaulted; hosts usually tweak a few fields on `EngineConfig::default()` or
//! load a partial JSON document with [`EngineConfig::from_json`].
//!
//! ## Sentinel values
//! - `max_items = 0` → unbounded queue
//! - `default_duration = 0` → items never auto-expire unless given a duration
//! - `create_throttle = 0` → no throttling
//!
//! Durations are (de)serialized as integer milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::item::Position;
use crate::layout::{LayoutConfig, StackStrategy};
use crate::range::RangeConfig;

/// Global configuration for an [`Engine`](crate::Engine).
///
/// ## Field semantics
/// - `max_items`: queue capacity; a full queue evicts its front item (`0` = unbounded)
/// - `prevent_duplicates`: return the existing id for a same-kind, same-message active item
/// - `default_position` / `default_duration`: fallbacks for `NotifyOptions`
/// - `animation_duration`: enter/exit hold before `visible` / `removed`
/// - `create_throttle`: minimum spacing between creations; high priority and
///   error variants bypass it
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `pool_*`: resource pool capacity per kind, idle expiry and sweep period
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_items: usize,
    pub prevent_duplicates: bool,
    pub default_position: Position,
    #[serde(with = "duration_ms")]
    pub default_duration: Duration,
    #[serde(with = "duration_ms")]
    pub animation_duration: Duration,
    #[serde(with = "duration_ms")]
    pub create_throttle: Duration,
    pub stack_strategy: StackStrategy,
    pub bus_capacity: usize,
    pub pool_max_per_kind: usize,
    #[serde(with = "duration_ms")]
    pub pool_idle_expiry: Duration,
    #[serde(with = "duration_ms")]
    pub pool_sweep_interval: Duration,
    pub layout: LayoutConfig,
    pub range: RangeConfig,
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON document; missing fields take defaults.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use toastvisor::EngineConfig;
    ///
    /// let cfg = EngineConfig::from_json(r#"{ "max_items": 5, "default_duration": 1500 }"#).unwrap();
    /// assert_eq!(cfg.capacity_limit(), Some(5));
    /// assert_eq!(cfg.default_duration, Duration::from_millis(1500));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Queue capacity as an `Option` (`None` = unbounded).
    #[inline]
    pub fn capacity_limit(&self) -> Option<usize> {
        if self.max_items == 0 {
            None
        } else {
            Some(self.max_items)
        }
    }

    /// Create throttle as an `Option` (`None` = disabled).
    #[inline]
    pub fn throttle(&self) -> Option<Duration> {
        if self.create_throttle.is_zero() {
            None
        } else {
            Some(self.create_throttle)
        }
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for EngineConfig {
    /// Default configuration:
    ///
    /// - unbounded queue, duplicates allowed
    /// - `TopRight`, 3s lifetime, 300ms animation, 50ms create throttle
    /// - `Stack` strategy, bus capacity 1024
    /// - pool: 10 per kind, 5s idle expiry, 5s sweep
    fn default() -> Self {
        Self {
            max_items: 0,
            prevent_duplicates: false,
            default_position: Position::TopRight,
            default_duration: Duration::from_millis(3000),
            animation_duration: Duration::from_millis(300),
            create_throttle: Duration::from_millis(50),
            stack_strategy: StackStrategy::Stack,
            bus_capacity: 1024,
            pool_max_per_kind: 10,
            pool_idle_expiry: Duration::from_millis(5000),
            pool_sweep_interval: Duration::from_millis(5000),
            layout: LayoutConfig::default(),
            range: RangeConfig::default(),
        }
    }
}

/// Serde adapter: `Duration` as integer milliseconds.
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
