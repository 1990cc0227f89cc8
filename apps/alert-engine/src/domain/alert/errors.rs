//! Alert validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// A malformed or incomplete alert. Only the sender can fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Payload is not a JSON object.
    #[error("Alert payload must be a JSON object")]
    NotAnObject,

    /// Required field absent.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// Value cannot be coerced to a decimal number.
    #[error("{field} must be convertible to a number, got {value}")]
    NotNumeric {
        /// Field name.
        field: &'static str,
        /// The offending value as received.
        value: String,
    },

    /// Value cannot be coerced to an integer.
    #[error("{field} must be convertible to an integer, got {value}")]
    NotInteger {
        /// Field name.
        field: &'static str,
        /// The offending value as received.
        value: String,
    },

    /// Value is not a string.
    #[error("{field} must be a string")]
    NotAString {
        /// Field name.
        field: &'static str,
    },

    /// Symbol is empty or whitespace.
    #[error("symbol must not be empty")]
    EmptySymbol,

    /// Action other than buy/sell.
    #[error("strategy_order_action must be 'buy' or 'sell', got '{value}'")]
    InvalidAction {
        /// The offending value as received.
        value: String,
    },

    /// Sizing produced nothing to trade.
    #[error("Order quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The computed quantity.
        quantity: Decimal,
    },
}

impl ValidationError {
    /// Name of the offending field, when there is one.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingField { field }
            | Self::NotNumeric { field, .. }
            | Self::NotInteger { field, .. }
            | Self::NotAString { field } => Some(field),
            Self::EmptySymbol => Some("symbol"),
            Self::InvalidAction { .. } => Some("strategy_order_action"),
            Self::NonPositiveQuantity { .. } => Some("strategy_order_contracts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::NotNumeric {
            field: "strategy_order_price",
            value: "\"abc\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "strategy_order_price must be convertible to a number, got \"abc\""
        );
        assert_eq!(err.field(), Some("strategy_order_price"));
    }

    #[test]
    fn missing_field_message() {
        let err = ValidationError::MissingField { field: "time" };
        assert_eq!(err.to_string(), "Missing required field 'time'");
    }

    #[test]
    fn not_an_object_has_no_field() {
        assert_eq!(ValidationError::NotAnObject.field(), None);
    }
}
