//! Account and position snapshots reported by the broker.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Broker account id.
    pub id: String,
    /// Total equity.
    pub equity: Decimal,
    /// Settled cash.
    pub cash: Decimal,
    /// Buying power.
    pub buying_power: Decimal,
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    /// Long.
    Long,
    /// Short.
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// An open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol.
    pub symbol: String,
    /// Size as reported.
    pub qty: Decimal,
    /// Direction.
    pub side: PositionSide,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub fn new(symbol: impl Into<String>, qty: Decimal, side: PositionSide) -> Self {
        Self {
            symbol: symbol.into(),
            qty,
            side,
        }
    }
}
