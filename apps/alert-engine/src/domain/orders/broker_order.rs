//! Order record as reported by the broker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::{OrderSide, OrderType};

/// A broker-side order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerOrder {
    /// Broker-assigned order id.
    pub id: String,
    /// Client order id, when one was attached.
    pub client_order_id: Option<String>,
    /// Symbol.
    pub symbol: String,
    /// Side.
    pub side: OrderSide,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Venue status string (`new`, `accepted`, `filled`, ...).
    pub status: String,
    /// Ordered quantity. Absent for notional orders.
    pub qty: Option<Decimal>,
    /// Filled quantity.
    pub filled_qty: Decimal,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl BrokerOrder {
    /// Case-insensitive status comparison.
    #[must_use]
    pub fn has_status(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case(status.trim())
    }
}
