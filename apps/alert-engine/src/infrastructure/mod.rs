//! Infrastructure Layer
//!
//! Adapters at the edge of the application:
//!
//! - [`broker`]: `BrokerPort` implementations (Alpaca, in-memory)
//! - [`http`]: axum REST adapter driving the use cases

pub mod broker;
pub mod http;
