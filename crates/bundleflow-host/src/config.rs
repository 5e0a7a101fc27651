//! Host Configuration - Scheduler throughput and default transition costs
//!
//! This module provides configuration for the simulated host's scheduler:
//! how many transitions advance per tick, and how many ticks a scene takes
//! to load or unload when the catalog does not say otherwise.

use serde::{Deserialize, Serialize};

/// Configuration for [`SimHost`](crate::SimHost) scheduling
///
/// # Example
///
/// ```
/// use bundleflow_host::HostConfig;
///
/// // One transition advances per tick (default)
/// let config = HostConfig::default();
/// assert_eq!(config.operations_per_tick(), 1);
///
/// // Zero is clamped to one
/// let config = HostConfig::default().with_operations_per_tick(0);
/// assert_eq!(config.operations_per_tick(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Number of pending transitions advanced each tick, highest priority first
    ///
    /// Clamped to at least 1.
    operations_per_tick: usize,
    /// Ticks a scene takes to reach the activation point when loading
    default_load_ticks: u32,
    /// Ticks a scene takes to unload
    default_unload_ticks: u32,
}

impl HostConfig {
    /// Set how many transitions advance per tick
    ///
    /// The value is clamped to at least 1.
    pub fn with_operations_per_tick(mut self, n: usize) -> Self {
        self.set_operations_per_tick(n);
        self
    }

    /// Set the default load cost in ticks (at least 1)
    pub fn with_default_load_ticks(mut self, ticks: u32) -> Self {
        self.default_load_ticks = ticks.max(1);
        self
    }

    /// Set the default unload cost in ticks (at least 1)
    pub fn with_default_unload_ticks(mut self, ticks: u32) -> Self {
        self.default_unload_ticks = ticks.max(1);
        self
    }

    /// Get how many transitions advance per tick
    pub fn operations_per_tick(&self) -> usize {
        self.operations_per_tick.max(1)
    }

    /// Set how many transitions advance per tick
    ///
    /// # Example
    ///
    /// ```
    /// use bundleflow_host::HostConfig;
    ///
    /// let mut config = HostConfig::default();
    /// config.set_operations_per_tick(4);
    /// assert_eq!(config.operations_per_tick(), 4);
    /// ```
    pub fn set_operations_per_tick(&mut self, n: usize) {
        self.operations_per_tick = n.max(1);
    }

    /// Default load cost in ticks
    pub fn default_load_ticks(&self) -> u32 {
        self.default_load_ticks.max(1)
    }

    /// Default unload cost in ticks
    pub fn default_unload_ticks(&self) -> u32 {
        self.default_unload_ticks.max(1)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            operations_per_tick: 1,
            default_load_ticks: 4,
            default_unload_ticks: 2,
        }
    }
}
