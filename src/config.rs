//! Global runtime configuration.
//!
//! [`Config`] defines the timings of the simulated work units and the
//! behavior of the scenario runner: how long the slow and fast units wait,
//! how often a runaway loop tics, how long the runner waits before declaring
//! a task stuck, and the event bus capacity.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use scopevisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.runaway_grace = Duration::from_secs(3);
//! cfg.bus_capacity = 256;
//!
//! assert_eq!(cfg.slow_delay, Duration::from_secs(5));
//! ```

use std::time::Duration;

/// Configuration for the scenario runner and its simulated work units.
#[derive(Clone, Debug)]
pub struct Config {
    /// Simulated duration of the slow unit's wait.
    pub slow_delay: Duration,
    /// Simulated duration of the faulty unit's wait before it fails.
    pub fast_delay: Duration,
    /// Interval between heartbeat tics of a runaway loop.
    pub tic_interval: Duration,
    /// How long the runner waits for a task before declaring it stuck and
    /// reporting that it never completes.
    pub runaway_grace: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `slow_delay = 5s`
    /// - `fast_delay = 2s`
    /// - `tic_interval = 500ms`
    /// - `runaway_grace = 10s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            slow_delay: Duration::from_secs(5),
            fast_delay: Duration::from_secs(2),
            tic_interval: Duration::from_millis(500),
            runaway_grace: Duration::from_secs(10),
            bus_capacity: 1024,
        }
    }
}
