//! Order Domain Types
//!
//! Value objects shared by the pipeline, the reconciler and the broker port.

pub mod broker_order;
pub mod client_order_id;
pub mod order_request;
pub mod value_objects;

pub use broker_order::BrokerOrder;
pub use client_order_id::ClientOrderId;
pub use order_request::OrderRequest;
pub use value_objects::{OrderSide, OrderType};
