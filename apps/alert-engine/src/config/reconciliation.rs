//! Reconciliation configuration for periodic orphaned order cleanup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Run cleanup passes on a timer.
    #[serde(default)]
    pub enabled: bool,
    /// Interval between passes in seconds.
    #[serde(default = "default_reconciliation_interval")]
    pub interval_secs: u64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_reconciliation_interval(),
        }
    }
}

impl ReconciliationConfig {
    /// Interval between passes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

const fn default_reconciliation_interval() -> u64 {
    300
}
