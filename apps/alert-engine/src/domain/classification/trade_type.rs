//! Entry/exit and long/short inference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::orders::OrderSide;

/// Whether an alert opens or closes a long or short position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Buy to open a long.
    LongEntry,
    /// Sell to close a long.
    LongExit,
    /// Sell to open a short.
    ShortEntry,
    /// Buy to close a short.
    ShortExit,
}

impl TradeType {
    /// Snake-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LongEntry => "long_entry",
            Self::LongExit => "long_exit",
            Self::ShortEntry => "short_entry",
            Self::ShortExit => "short_exit",
        }
    }

    /// True for the two closing variants.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::LongExit | Self::ShortExit)
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the trade type from the strategy order id and the action.
///
/// An id containing `exit` or `close` (any case) marks a closing trade.
#[must_use]
pub fn classify_trade_type(strategy_order_id: &str, action: OrderSide) -> TradeType {
    let id = strategy_order_id.to_lowercase();
    let closing = id.contains("exit") || id.contains("close");

    match (action, closing) {
        (OrderSide::Buy, true) => TradeType::ShortExit,
        (OrderSide::Buy, false) => TradeType::LongEntry,
        (OrderSide::Sell, true) => TradeType::LongExit,
        (OrderSide::Sell, false) => TradeType::ShortEntry,
    }
}
