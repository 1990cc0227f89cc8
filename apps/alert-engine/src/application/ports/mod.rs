//! Application Ports
//!
//! Driven ports the use cases depend on.

mod broker_port;

pub use broker_port::{BrokerError, BrokerPort};
