//! Order side and order type value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl OrderSide {
    /// Wire name used by alerts and brokers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Parse a side, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
    /// Stop order - becomes market order when stop price is reached.
    Stop,
    /// Stop-limit order - becomes limit order when stop price is reached.
    StopLimit,
    /// Trailing stop order.
    TrailingStop,
    /// Any type the venue reports that we do not model.
    #[serde(other)]
    Other,
}

impl OrderType {
    /// Parse a broker order type string, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "market" => Self::Market,
            "limit" => Self::Limit,
            "stop" => Self::Stop,
            "stop_limit" => Self::StopLimit,
            "trailing_stop" => Self::TrailingStop,
            _ => Self::Other,
        }
    }

    /// Stop-loss style protective order.
    #[must_use]
    pub const fn is_stop_loss(&self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }

    /// Take-profit style protective order.
    #[must_use]
    pub const fn is_take_profit(&self) -> bool {
        matches!(self, Self::Limit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Limit => write!(f, "limit"),
            Self::Stop => write!(f, "stop"),
            Self::StopLimit => write!(f, "stop_limit"),
            Self::TrailingStop => write!(f, "trailing_stop"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_side_parse_is_case_insensitive() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse(" Sell "), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("hold"), None);
    }

    #[test]
    fn order_side_serde() {
        let json = serde_json::to_string(&OrderSide::Sell).unwrap();
        assert_eq!(json, "\"sell\"");
    }

    #[test]
    fn order_type_parse() {
        assert_eq!(OrderType::parse("stop_limit"), OrderType::StopLimit);
        assert_eq!(OrderType::parse("LIMIT"), OrderType::Limit);
        assert_eq!(OrderType::parse("bracket"), OrderType::Other);
    }

    #[test]
    fn protective_order_kinds() {
        assert!(OrderType::Stop.is_stop_loss());
        assert!(OrderType::StopLimit.is_stop_loss());
        assert!(OrderType::Limit.is_take_profit());
        assert!(!OrderType::Market.is_stop_loss());
        assert!(!OrderType::Market.is_take_profit());
        assert!(!OrderType::TrailingStop.is_stop_loss());
    }

    #[test]
    fn order_type_display() {
        assert_eq!(OrderType::StopLimit.to_string(), "stop_limit");
        assert_eq!(OrderType::Market.to_string(), "market");
    }
}
