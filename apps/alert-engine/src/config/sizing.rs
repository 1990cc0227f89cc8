//! Position sizing configuration.

use serde::{Deserialize, Serialize};

use crate::domain::sizing::{SizingParams, SizingStrategy};

/// Sizing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Strategy name. Unknown names fall back to `signal_provided`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Strategy parameters.
    #[serde(default)]
    pub params: SizingParams,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            params: SizingParams::default(),
        }
    }
}

impl SizingConfig {
    /// Resolve the configured strategy.
    #[must_use]
    pub fn resolve_strategy(&self) -> SizingStrategy {
        SizingStrategy::from_name(&self.strategy)
    }
}

fn default_strategy() -> String {
    SizingStrategy::SignalProvided.as_str().to_string()
}
