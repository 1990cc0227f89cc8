//! Broker Adapters
//!
//! Implementations of `BrokerPort`.

pub mod alpaca;
pub mod in_memory;

pub use alpaca::{ALPACA_BROKER_NAME, AlpacaBrokerAdapter, AlpacaConfig, AlpacaEnvironment, AlpacaError};
pub use in_memory::InMemoryBroker;
