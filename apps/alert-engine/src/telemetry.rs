//! Tracing Setup
//!
//! Initializes the global `tracing` subscriber.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives, overrides `observability.logging.level`
//! - `observability.logging.format`: `json` for structured output, `pretty`
//!   for human-readable console output
//!
//! # Usage
//!
//! ```rust,ignore
//! use alert_engine::telemetry::init_tracing;
//!
//! init_tracing(&config.observability.logging)?;
//! ```

use tracing_subscriber::{
    EnvFilter,
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set and valid, else the configured level.
#[must_use]
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = env_filter(logging);

    if logging.format == "pretty" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .finish()
            .try_init()?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .finish()
            .try_init()?;
    }

    tracing::info!(
        level = %logging.level,
        format = %logging.format,
        "Tracing initialized"
    );
    Ok(())
}
