//! Sizing strategies and their parameters.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How the raw order quantity is derived from an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingStrategy {
    /// Use the contracts carried by the alert.
    SignalProvided,
    /// Spend a fraction of account equity at the alert price.
    PercentOfEquity,
    /// Spend a fixed cash amount at the alert price.
    FixedNotional,
    /// Always trade the same quantity.
    FixedQuantity,
}

impl SizingStrategy {
    /// Parse a strategy name. Accepts the canonical names and the short
    /// aliases `tradingview`, `percentage`, `notional` and `fixed`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "signal_provided" | "tradingview" => Some(Self::SignalProvided),
            "percent_of_equity" | "percentage" => Some(Self::PercentOfEquity),
            "fixed_notional" | "notional" => Some(Self::FixedNotional),
            "fixed_quantity" | "fixed" => Some(Self::FixedQuantity),
            _ => None,
        }
    }

    /// Resolve a configured name, falling back to [`Self::SignalProvided`]
    /// with a warning when the name is not recognized.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(
                strategy = %name,
                "Unknown sizing strategy, using alert contracts"
            );
            Self::SignalProvided
        })
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SignalProvided => "signal_provided",
            Self::PercentOfEquity => "percent_of_equity",
            Self::FixedNotional => "fixed_notional",
            Self::FixedQuantity => "fixed_quantity",
        }
    }

    /// Whether sizing needs the account equity.
    #[must_use]
    pub const fn requires_equity(&self) -> bool {
        matches!(self, Self::PercentOfEquity)
    }
}

impl fmt::Display for SizingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters shared by all strategies. Each strategy reads only its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingParams {
    /// Fraction of equity for `percent_of_equity` (0.02 = 2%).
    #[serde(default = "default_percent_of_equity")]
    pub percent_of_equity: Decimal,
    /// Cash amount for `fixed_notional`.
    #[serde(default = "default_notional_amount")]
    pub notional_amount: Decimal,
    /// Quantity for `fixed_quantity`.
    #[serde(default = "default_fixed_quantity")]
    pub fixed_quantity: Decimal,
}

fn default_percent_of_equity() -> Decimal {
    dec!(0.02)
}

fn default_notional_amount() -> Decimal {
    dec!(1000)
}

fn default_fixed_quantity() -> Decimal {
    Decimal::ONE
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            percent_of_equity: default_percent_of_equity(),
            notional_amount: default_notional_amount(),
            fixed_quantity: default_fixed_quantity(),
        }
    }
}
