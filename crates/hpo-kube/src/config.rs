//! Planner configuration
//!
//! The library never reads the process environment; callers (the CLI) map
//! flags and environment variables onto [`PlannerConfig`].

use std::time::Duration;

/// Default time to wait for a created CRD to become established
pub const DEFAULT_ESTABLISH_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the installation planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Whether to inspect the cluster to decide who owns the helm-controller CRDs.
    ///
    /// When disabled, the operator always manages them.
    pub detect_runtime_ownership: bool,

    /// How long to wait for each created CRD to report `Established`
    pub establish_timeout: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            detect_runtime_ownership: true,
            establish_timeout: DEFAULT_ESTABLISH_TIMEOUT,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable runtime ownership detection
    pub fn with_runtime_detection(mut self, enabled: bool) -> Self {
        self.detect_runtime_ownership = enabled;
        self
    }

    /// Set the establish timeout
    pub fn with_establish_timeout(mut self, timeout: Duration) -> Self {
        self.establish_timeout = timeout;
        self
    }
}
