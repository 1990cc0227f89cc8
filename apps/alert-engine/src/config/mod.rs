//! Configuration module for the alert engine.
//!
//! Loads a YAML file, interpolates environment variables and validates the
//! result before anything is wired.
//!
//! # Usage
//!
//! ```rust,ignore
//! use alert_engine::config::load_config;
//!
//! let config = load_config(Some("config.yaml"))?;
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod broker;
mod observability;
mod reconciliation;
mod server;
mod sizing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use broker::BrokerConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use reconciliation::ReconciliationConfig;
pub use server::ServerConfig;
pub use sizing::SizingConfig;

use crate::application::PipelineSettings;
use crate::domain::sizing::{AssetConstraints, BrokerConstraints};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broker configuration.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Sizing strategy and parameters.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Per asset class order size constraints.
    #[serde(default)]
    pub constraints: BrokerConstraints,
    /// Periodic orphaned order cleanup.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Prefix of generated client order ids.
    #[serde(default = "default_client_order_id_prefix")]
    pub client_order_id_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            broker: BrokerConfig::default(),
            sizing: SizingConfig::default(),
            constraints: BrokerConstraints::default(),
            reconciliation: ReconciliationConfig::default(),
            observability: ObservabilityConfig::default(),
            client_order_id_prefix: default_client_order_id_prefix(),
        }
    }
}

impl Config {
    /// Settings for the alert pipeline.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            strategy: self.sizing.resolve_strategy(),
            params: self.sizing.params.clone(),
            constraints: self.constraints.clone(),
            client_order_id_prefix: self.client_order_id_prefix.clone(),
        }
    }
}

fn default_client_order_id_prefix() -> String {
    "tv".to_string()
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. An unset or empty
/// variable without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match caps.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(value)) if !value.is_empty() => value,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    if config.broker.alpaca_environment().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "broker.environment must be PAPER or LIVE, got '{}'",
            config.broker.environment
        )));
    }

    if config.broker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "broker.timeout_secs must be positive".to_string(),
        ));
    }

    let params = &config.sizing.params;
    if params.percent_of_equity <= Decimal::ZERO || params.percent_of_equity > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "sizing.params.percent_of_equity must be in (0, 1]".to_string(),
        ));
    }
    if params.notional_amount <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "sizing.params.notional_amount must be positive".to_string(),
        ));
    }
    if params.fixed_quantity <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "sizing.params.fixed_quantity must be positive".to_string(),
        ));
    }

    validate_asset_constraints("crypto", &config.constraints.crypto)?;
    validate_asset_constraints("equity", &config.constraints.equity)?;
    validate_asset_constraints("forex", &config.constraints.forex)?;

    if config.reconciliation.enabled && config.reconciliation.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "reconciliation.interval_secs must be positive when enabled".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if config.client_order_id_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "client_order_id_prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_asset_constraints(name: &str, constraints: &AssetConstraints) -> Result<(), ConfigError> {
    if constraints.min_order_size < Decimal::ZERO || constraints.lot_size < Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "constraints.{name}: min_order_size and lot_size must not be negative"
        )));
    }
    if constraints
        .max_order_size
        .is_some_and(|max| max < constraints.min_order_size)
    {
        return Err(ConfigError::ValidationError(format!(
            "constraints.{name}.max_order_size must not be below min_order_size"
        )));
    }
    Ok(())
}
