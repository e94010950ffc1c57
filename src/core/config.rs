//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings for the supervisor
//! runtime. Used in two ways:
//! 1. **Supervisor creation**: `Supervisor::builder(config)`
//! 2. **Registry construction**: `Registry::workers(bus, &config)`
//!
//! ## Field semantics
//! - `grace`: maximum wait for all units to exit during teardown
//! - `join_grace`: per-terminate bound on waiting for one unit to exit
//! - `tick`: idle tick a running unit sleeps between gate checks
//! - `command_pause`: dispatcher yield between consecutive commands
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)

use std::time::Duration;

/// Global configuration for the supervisor runtime.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time teardown waits for all units to exit.
    ///
    /// When the dispatcher stops or a shutdown signal arrives, every live
    /// unit is force-stopped and the supervisor waits up to `grace` for
    /// them to exit. Exceeding it returns `RuntimeError::GraceExceeded`.
    pub grace: Duration,

    /// Per-terminate bound on joining one unit's vehicle.
    ///
    /// A unit that does not exit within `join_grace` is reported as stuck
    /// in its terminate event instead of hanging the caller.
    pub join_grace: Duration,

    /// Idle tick performed by a running unit between gate checks.
    pub tick: Duration,

    /// Pause the dispatcher takes between consecutive commands.
    ///
    /// Bounds the burst rate of queued commands; it plays no role in
    /// correctness.
    pub command_pause: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 10s`
    /// - `join_grace = 2s`
    /// - `tick = 1s`
    /// - `command_pause = 500ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(10),
            join_grace: Duration::from_secs(2),
            tick: Duration::from_secs(1),
            command_pause: Duration::from_millis(500),
            bus_capacity: 1024,
        }
    }
}
