//! Broker connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::broker::{AlpacaConfig, AlpacaEnvironment};

/// Broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Trading environment: PAPER or LIVE.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret.
    #[serde(default)]
    pub api_secret: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override for the trading API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

impl BrokerConfig {
    /// Parsed environment, `None` when the value is not PAPER or LIVE.
    #[must_use]
    pub fn alpaca_environment(&self) -> Option<AlpacaEnvironment> {
        match self.environment.trim().to_ascii_uppercase().as_str() {
            "PAPER" => Some(AlpacaEnvironment::Paper),
            "LIVE" => Some(AlpacaEnvironment::Live),
            _ => None,
        }
    }

    /// Build the Alpaca adapter configuration.
    ///
    /// Assumes the config has been validated; an unknown environment falls
    /// back to PAPER.
    #[must_use]
    pub fn to_alpaca_config(&self) -> AlpacaConfig {
        let config = AlpacaConfig::new(
            self.api_key.clone(),
            self.api_secret.clone(),
            self.alpaca_environment().unwrap_or_default(),
        )
        .with_timeout(Duration::from_secs(self.timeout_secs));

        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => config.with_base_url(url),
            _ => config,
        }
    }
}

fn default_environment() -> String {
    "PAPER".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}
