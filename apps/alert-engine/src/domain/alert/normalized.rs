//! Normalized alert record.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::orders::OrderSide;

/// Fields the validator understands. Everything else is carried in `extra`.
pub const KNOWN_FIELDS: [&str; 7] = [
    "symbol",
    "strategy_order_id",
    "strategy_order_action",
    "strategy_order_contracts",
    "strategy_order_price",
    "time",
    "strategy_order_comment",
];

/// A validated, type-coerced alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAlert {
    /// Instrument symbol as sent.
    pub symbol: String,
    /// Strategy-side order id (e.g. "long", "exit_long").
    pub strategy_order_id: String,
    /// Normalized action.
    pub strategy_order_action: OrderSide,
    /// Contracts requested by the signal.
    pub strategy_order_contracts: Decimal,
    /// Signal price.
    pub strategy_order_price: Decimal,
    /// Signal time in epoch milliseconds.
    pub time: i64,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_order_comment: Option<String>,
    /// Unknown fields, preserved as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedAlert {
    /// Serialize back into a raw JSON object.
    ///
    /// Decimals are written as strings so no precision is lost when the
    /// result is validated again.
    #[must_use]
    pub fn to_raw(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("symbol".into(), Value::String(self.symbol.clone()));
        map.insert(
            "strategy_order_id".into(),
            Value::String(self.strategy_order_id.clone()),
        );
        map.insert(
            "strategy_order_action".into(),
            Value::String(self.strategy_order_action.as_str().to_string()),
        );
        map.insert(
            "strategy_order_contracts".into(),
            Value::String(self.strategy_order_contracts.to_string()),
        );
        map.insert(
            "strategy_order_price".into(),
            Value::String(self.strategy_order_price.to_string()),
        );
        map.insert("time".into(), Value::from(self.time));
        if let Some(comment) = &self.strategy_order_comment {
            map.insert("strategy_order_comment".into(), Value::String(comment.clone()));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn alert() -> NormalizedAlert {
        let mut extra = Map::new();
        extra.insert("exchange".into(), json!("COINBASE"));
        NormalizedAlert {
            symbol: "BTCUSD".to_string(),
            strategy_order_id: "long".to_string(),
            strategy_order_action: OrderSide::Buy,
            strategy_order_contracts: dec!(0.10),
            strategy_order_price: dec!(65000.5),
            time: 1_713_746_400_000,
            strategy_order_comment: None,
            extra,
        }
    }

    #[test]
    fn to_raw_keeps_extra_fields_and_decimal_scale() {
        let raw = alert().to_raw();
        assert_eq!(raw["exchange"], "COINBASE");
        assert_eq!(raw["strategy_order_contracts"], "0.10");
        assert_eq!(raw["strategy_order_action"], "buy");
        assert_eq!(raw["time"], 1_713_746_400_000_i64);
        assert!(raw.get("strategy_order_comment").is_none());
    }

    #[test]
    fn serialize_flattens_extra() {
        let json = serde_json::to_value(alert()).unwrap();
        assert_eq!(json["exchange"], "COINBASE");
        assert_eq!(json["symbol"], "BTCUSD");
    }
}
