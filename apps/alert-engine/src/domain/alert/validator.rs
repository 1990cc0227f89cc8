//! Alert validation and type coercion.
//!
//! Numeric fields are coerced before the structural checks run, so a
//! TradingView template that quotes its placeholders (`"{{strategy.order.contracts}}"`)
//! is accepted the same way as a bare number.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::errors::ValidationError;
use super::normalized::{KNOWN_FIELDS, NormalizedAlert};
use crate::domain::orders::OrderSide;

/// Validate a raw alert payload and coerce its fields.
///
/// # Errors
///
/// Returns `ValidationError` naming the first offending field.
pub fn validate(raw: &Value) -> Result<NormalizedAlert, ValidationError> {
    let Value::Object(map) = raw else {
        return Err(ValidationError::NotAnObject);
    };

    let contracts = coerce_optional(map, "strategy_order_contracts", coerce_decimal)?;
    let price = coerce_optional(map, "strategy_order_price", coerce_decimal)?;
    let time = coerce_optional(map, "time", coerce_integer)?;

    let symbol = required_string(map, "symbol")?;
    if symbol.trim().is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    let strategy_order_id = required_string(map, "strategy_order_id")?;
    let action = required_string(map, "strategy_order_action")?;
    let strategy_order_contracts = contracts.ok_or(ValidationError::MissingField {
        field: "strategy_order_contracts",
    })?;
    let strategy_order_price = price.ok_or(ValidationError::MissingField {
        field: "strategy_order_price",
    })?;
    let time = time.ok_or(ValidationError::MissingField { field: "time" })?;

    let strategy_order_action =
        OrderSide::parse(action).ok_or_else(|| ValidationError::InvalidAction {
            value: action.to_string(),
        })?;

    let strategy_order_comment = match map.get("strategy_order_comment") {
        None => None,
        Some(Value::String(comment)) => Some(comment.clone()),
        Some(_) => {
            return Err(ValidationError::NotAString {
                field: "strategy_order_comment",
            });
        }
    };

    let extra: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    tracing::debug!(
        symbol = %symbol,
        action = %strategy_order_action,
        contracts = %strategy_order_contracts,
        extra_fields = extra.len(),
        "Alert validated"
    );

    Ok(NormalizedAlert {
        symbol: symbol.to_string(),
        strategy_order_id: strategy_order_id.to_string(),
        strategy_order_action,
        strategy_order_contracts,
        strategy_order_price,
        time,
        strategy_order_comment,
        extra,
    })
}

fn coerce_optional<T>(
    map: &Map<String, Value>,
    field: &'static str,
    coerce: fn(&'static str, &Value) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    map.get(field).map(|value| coerce(field, value)).transpose()
}

fn required_string<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match map.get(field) {
        None => Err(ValidationError::MissingField { field }),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ValidationError::NotAString { field }),
    }
}

fn coerce_decimal(field: &'static str, value: &Value) -> Result<Decimal, ValidationError> {
    let parsed = match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::NotNumeric {
        field,
        value: value.to_string(),
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn coerce_integer(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_float)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::NotInteger {
        field,
        value: value.to_string(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use test_case::test_case;

    fn valid_payload() -> Value {
        json!({
            "symbol": "BTCUSD",
            "strategy_order_id": "long",
            "strategy_order_action": "buy",
            "strategy_order_contracts": 0.1,
            "strategy_order_price": 65000,
            "time": 1_713_746_400_000_i64
        })
    }

    #[test]
    fn accepts_well_formed_alert() {
        let alert = validate(&valid_payload()).unwrap();
        assert_eq!(alert.symbol, "BTCUSD");
        assert_eq!(alert.strategy_order_action, OrderSide::Buy);
        assert_eq!(alert.strategy_order_contracts, dec!(0.1));
        assert_eq!(alert.strategy_order_price, dec!(65000));
        assert_eq!(alert.time, 1_713_746_400_000);
        assert!(alert.extra.is_empty());
    }

    #[test]
    fn coerces_numeric_strings() {
        let mut payload = valid_payload();
        payload["strategy_order_contracts"] = json!(" 0.25 ");
        payload["strategy_order_price"] = json!("101.5");
        payload["time"] = json!("1713746400000");

        let alert = validate(&payload).unwrap();
        assert_eq!(alert.strategy_order_contracts, dec!(0.25));
        assert_eq!(alert.strategy_order_price, dec!(101.5));
        assert_eq!(alert.time, 1_713_746_400_000);
    }

    #[test]
    fn accepts_scientific_notation() {
        let mut payload = valid_payload();
        payload["strategy_order_contracts"] = json!("1e-3");
        let alert = validate(&payload).unwrap();
        assert_eq!(alert.strategy_order_contracts, dec!(0.001));
    }

    #[test]
    fn truncates_float_time() {
        let mut payload = valid_payload();
        payload["time"] = json!(1_713_746_400_000.9_f64);
        assert_eq!(validate(&payload).unwrap().time, 1_713_746_400_000);
    }

    #[test_case("strategy_order_contracts", json!("abc") ; "contracts not numeric")]
    #[test_case("strategy_order_price", json!("12,5") ; "price with comma")]
    #[test_case("strategy_order_price", json!(true) ; "price boolean")]
    #[test_case("strategy_order_contracts", json!(null) ; "contracts null")]
    #[test_case("strategy_order_price", json!("NaN") ; "price nan")]
    fn rejects_non_numeric(field: &str, value: Value) {
        let mut payload = valid_payload();
        payload[field] = value;
        let err = validate(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::NotNumeric { .. }));
        assert_eq!(err.field(), Some(field));
    }

    #[test_case(json!("12.5") ; "decimal string")]
    #[test_case(json!("soon") ; "word")]
    #[test_case(json!([1]) ; "array")]
    fn rejects_non_integer_time(value: Value) {
        let mut payload = valid_payload();
        payload["time"] = value;
        let err = validate(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::NotInteger { field: "time", .. }));
    }

    #[test_case("symbol")]
    #[test_case("strategy_order_id")]
    #[test_case("strategy_order_action")]
    #[test_case("strategy_order_contracts")]
    #[test_case("strategy_order_price")]
    #[test_case("time")]
    fn missing_required_field_is_named(field: &str) {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove(field);
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field(), Some(field));
        assert!(err.to_string().contains(field));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert_eq!(
            validate(&json!(["BTCUSD"])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn rejects_blank_symbol() {
        let mut payload = valid_payload();
        payload["symbol"] = json!("   ");
        assert_eq!(validate(&payload).unwrap_err(), ValidationError::EmptySymbol);
    }

    #[test]
    fn rejects_numeric_symbol() {
        let mut payload = valid_payload();
        payload["symbol"] = json!(42);
        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::NotAString { field: "symbol" }
        );
    }

    #[test_case("BUY", OrderSide::Buy)]
    #[test_case("Sell", OrderSide::Sell)]
    fn action_is_case_insensitive(action: &str, expected: OrderSide) {
        let mut payload = valid_payload();
        payload["strategy_order_action"] = json!(action);
        assert_eq!(validate(&payload).unwrap().strategy_order_action, expected);
    }

    #[test]
    fn rejects_unknown_action() {
        let mut payload = valid_payload();
        payload["strategy_order_action"] = json!("hold");
        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::InvalidAction {
                value: "hold".to_string()
            }
        );
    }

    #[test]
    fn comment_must_be_a_string() {
        let mut payload = valid_payload();
        payload["strategy_order_comment"] = json!(7);
        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::NotAString {
                field: "strategy_order_comment"
            }
        );

        payload["strategy_order_comment"] = json!("breakout");
        assert_eq!(
            validate(&payload).unwrap().strategy_order_comment.as_deref(),
            Some("breakout")
        );
    }

    #[test]
    fn preserves_unknown_fields() {
        let mut payload = valid_payload();
        payload["exchange"] = json!("COINBASE");
        payload["position_size"] = json!(3);

        let alert = validate(&payload).unwrap();
        assert_eq!(alert.extra.get("exchange"), Some(&json!("COINBASE")));
        assert_eq!(alert.extra.get("position_size"), Some(&json!(3)));
        assert_eq!(alert.to_raw()["exchange"], "COINBASE");
    }

    #[test]
    fn revalidating_normalized_alert_is_identity() {
        let mut payload = valid_payload();
        payload["strategy_order_comment"] = json!("entry");
        payload["exchange"] = json!("COINBASE");

        let first = validate(&payload).unwrap();
        let second = validate(&first.to_raw()).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn revalidation_is_identity_for_any_alert(
            symbol in "[A-Z]{1,6}",
            mantissa in 1i64..1_000_000_000,
            scale in 0u32..9,
            price_cents in 0i64..100_000_000,
            time in any::<i64>(),
            sell in any::<bool>(),
        ) {
            let payload = json!({
                "symbol": symbol,
                "strategy_order_id": "long",
                "strategy_order_action": if sell { "sell" } else { "buy" },
                "strategy_order_contracts": Decimal::new(mantissa, scale).to_string(),
                "strategy_order_price": Decimal::new(price_cents, 2).to_string(),
                "time": time,
            });

            let first = validate(&payload).unwrap();
            let second = validate(&first.to_raw()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
