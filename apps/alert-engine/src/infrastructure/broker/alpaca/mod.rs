//! Alpaca Markets Broker Adapter
//!
//! Implementation of `BrokerPort` for the Alpaca trading API:
//! - API-key header authentication
//! - PAPER and LIVE environments, with a base URL override
//! - HTTP status categorization into typed errors, one attempt per call

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::{ALPACA_BROKER_NAME, AlpacaBrokerAdapter};
pub use config::{AlpacaConfig, AlpacaEnvironment};
pub use error::AlpacaError;
