//! Alpaca API request and response types.
//!
//! These types map directly to Alpaca's REST API format. Numeric fields
//! arrive as strings and are parsed into `Decimal` on conversion.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AlpacaError;
use crate::domain::account::{AccountInfo, Position, PositionSide};
use crate::domain::orders::{BrokerOrder, OrderRequest, OrderSide, OrderType};

// ============================================================================
// Order Request Types
// ============================================================================

/// Market order request for Alpaca API.
#[derive(Debug, Clone, Serialize)]
pub struct AlpacaOrderRequest {
    /// Symbol.
    pub symbol: String,
    /// Quantity as a decimal string.
    pub qty: String,
    /// Order side.
    pub side: String,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Time in force.
    pub time_in_force: String,
    /// Client order ID.
    pub client_order_id: String,
}

impl AlpacaOrderRequest {
    /// Good-til-cancelled market order for `request`.
    #[must_use]
    pub fn market(request: &OrderRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            qty: request.quantity.normalize().to_string(),
            side: request.side.as_str().to_string(),
            order_type: "market".to_string(),
            time_in_force: "gtc".to_string(),
            client_order_id: request.client_order_id.to_string(),
        }
    }
}

// ============================================================================
// Order Response Types
// ============================================================================

/// Order response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOrderResponse {
    /// Broker order ID.
    pub id: String,
    /// Client order ID.
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Symbol.
    pub symbol: String,
    /// Quantity (as string). Null for notional orders.
    #[serde(default)]
    pub qty: Option<String>,
    /// Filled quantity (as string).
    #[serde(default)]
    pub filled_qty: Option<String>,
    /// Order status.
    pub status: String,
    /// Order side.
    pub side: String,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Created timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AlpacaOrderResponse {
    /// Convert to the domain order record.
    ///
    /// # Errors
    ///
    /// `JsonParse` when the side or a quantity cannot be parsed.
    pub fn to_broker_order(&self) -> Result<BrokerOrder, AlpacaError> {
        let side = OrderSide::parse(&self.side)
            .ok_or_else(|| AlpacaError::JsonParse(format!("invalid order side '{}'", self.side)))?;
        let qty = self
            .qty
            .as_deref()
            .map(|q| parse_decimal("qty", q))
            .transpose()?;
        let filled_qty = self
            .filled_qty
            .as_deref()
            .map(|q| parse_decimal("filled_qty", q))
            .transpose()?
            .unwrap_or(Decimal::ZERO);

        Ok(BrokerOrder {
            id: self.id.clone(),
            client_order_id: self.client_order_id.clone().filter(|id| !id.is_empty()),
            symbol: self.symbol.clone(),
            side,
            order_type: OrderType::parse(&self.order_type),
            status: self.status.clone(),
            qty,
            filled_qty,
            created_at: self
                .created_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|ts| ts.with_timezone(&Utc)),
        })
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Account response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaAccountResponse {
    /// Account ID.
    pub id: String,
    /// Account equity.
    pub equity: String,
    /// Cash balance.
    pub cash: String,
    /// Buying power.
    pub buying_power: String,
}

impl AlpacaAccountResponse {
    /// Convert to the domain account record.
    ///
    /// # Errors
    ///
    /// `JsonParse` when a balance cannot be parsed.
    pub fn to_account_info(&self) -> Result<AccountInfo, AlpacaError> {
        Ok(AccountInfo {
            id: self.id.clone(),
            equity: parse_decimal("equity", &self.equity)?,
            cash: parse_decimal("cash", &self.cash)?,
            buying_power: parse_decimal("buying_power", &self.buying_power)?,
        })
    }
}

// ============================================================================
// Position Types
// ============================================================================

/// Position response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaPositionResponse {
    /// Symbol.
    pub symbol: String,
    /// Quantity.
    pub qty: String,
    /// Side (long/short).
    pub side: String,
}

impl AlpacaPositionResponse {
    /// Convert to the domain position record.
    ///
    /// # Errors
    ///
    /// `JsonParse` when the quantity cannot be parsed.
    pub fn to_position(&self) -> Result<Position, AlpacaError> {
        let side = if self.side.eq_ignore_ascii_case("short") {
            PositionSide::Short
        } else {
            PositionSide::Long
        };
        Ok(Position::new(
            self.symbol.clone(),
            parse_decimal("qty", &self.qty)?,
            side,
        ))
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaErrorResponse {
    /// Error code. Alpaca sends a number; some proxies send a string.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// Error message.
    pub message: String,
}

impl AlpacaErrorResponse {
    /// Error code as text.
    #[must_use]
    pub fn code_text(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(code) => Some(code.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, AlpacaError> {
    Decimal::from_str(value.trim())
        .map_err(|e| AlpacaError::JsonParse(format!("invalid {field} '{value}': {e}")))
}
