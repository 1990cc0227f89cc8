//! Order request handed to the broker gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::client_order_id::ClientOrderId;
use super::value_objects::OrderSide;

/// A market order request built from one alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Quantity after constraint adjustment. Always positive.
    pub quantity: Decimal,
    /// Caller-generated correlation id.
    pub client_order_id: ClientOrderId,
}

impl OrderRequest {
    /// Create a market order request.
    #[must_use]
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        client_order_id: ClientOrderId,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            client_order_id,
        }
    }
}
