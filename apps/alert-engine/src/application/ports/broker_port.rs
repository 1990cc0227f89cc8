//! Broker Port (Driven Port)
//!
//! Capability contract for the broker gateway. The pipeline and the
//! reconciler only ever talk to a broker through this trait.

use async_trait::async_trait;

use crate::domain::account::{AccountInfo, Position};
use crate::domain::orders::{BrokerOrder, OrderRequest};

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Broker unreachable or credentials refused.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Request rejected by the broker.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Order not found.
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The missing order ID.
        order_id: String,
    },

    /// Rate limited.
    #[error("Rate limited by broker")]
    RateLimited,

    /// Unknown error.
    #[error("Broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

impl BrokerError {
    /// True when the broker could not be reached at all.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::ConnectionError { .. })
    }
}

/// Port for broker interactions.
///
/// Every method is a single attempt; callers decide what a failure means.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Probe the broker. Never fails; returns `false` when unreachable.
    async fn connect(&self) -> bool;

    /// Fetch account balances.
    async fn get_account_info(&self) -> Result<AccountInfo, BrokerError>;

    /// Place a market order.
    async fn place_market_order(&self, request: &OrderRequest) -> Result<BrokerOrder, BrokerError>;

    /// Fetch one order by broker id.
    async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError>;

    /// Fetch all open orders.
    async fn get_orders(&self) -> Result<Vec<BrokerOrder>, BrokerError>;

    /// Cancel an order by broker id.
    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;

    /// Fetch all open positions.
    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError>;
}
