//! Broker order-size constraints per asset class.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::classification::AssetClass;

/// Size limits for one asset class.
///
/// A zero `lot_size` disables rounding; a missing `max_order_size` is
/// unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetConstraints {
    /// Positive quantities below this are raised to it.
    #[serde(default)]
    pub min_order_size: Decimal,
    /// Quantities are rounded to a multiple of this.
    #[serde(default)]
    pub lot_size: Decimal,
    /// Quantities above this are capped.
    #[serde(default)]
    pub max_order_size: Option<Decimal>,
}

impl AssetConstraints {
    /// Constraints with the given minimum and lot size and no maximum.
    #[must_use]
    pub const fn new(min_order_size: Decimal, lot_size: Decimal) -> Self {
        Self {
            min_order_size,
            lot_size,
            max_order_size: None,
        }
    }

    /// Set the maximum order size.
    #[must_use]
    pub const fn with_max(mut self, max_order_size: Decimal) -> Self {
        self.max_order_size = Some(max_order_size);
        self
    }
}

/// Constraints for every asset class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConstraints {
    /// Crypto pairs.
    #[serde(default = "default_crypto")]
    pub crypto: AssetConstraints,
    /// Stocks and ETFs.
    #[serde(default = "default_equity")]
    pub equity: AssetConstraints,
    /// Currency pairs.
    #[serde(default = "default_forex")]
    pub forex: AssetConstraints,
}

fn default_crypto() -> AssetConstraints {
    AssetConstraints::new(dec!(0.001), dec!(0.001))
}

fn default_equity() -> AssetConstraints {
    AssetConstraints::new(Decimal::ONE, Decimal::ONE)
}

fn default_forex() -> AssetConstraints {
    AssetConstraints::new(dec!(0.01), dec!(0.01))
}

impl Default for BrokerConstraints {
    fn default() -> Self {
        Self {
            crypto: default_crypto(),
            equity: default_equity(),
            forex: default_forex(),
        }
    }
}

impl BrokerConstraints {
    /// No limits for any asset class.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            crypto: AssetConstraints::default(),
            equity: AssetConstraints::default(),
            forex: AssetConstraints::default(),
        }
    }

    /// Constraints for one asset class.
    #[must_use]
    pub const fn for_asset_class(&self, asset_class: AssetClass) -> &AssetConstraints {
        match asset_class {
            AssetClass::Crypto => &self.crypto,
            AssetClass::Equity => &self.equity,
            AssetClass::Forex => &self.forex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_asset_class() {
        let constraints = BrokerConstraints::default();
        assert_eq!(
            constraints.for_asset_class(AssetClass::Crypto),
            &AssetConstraints::new(dec!(0.001), dec!(0.001))
        );
        assert_eq!(
            constraints.for_asset_class(AssetClass::Equity).lot_size,
            dec!(1)
        );
        assert_eq!(
            constraints.for_asset_class(AssetClass::Forex).min_order_size,
            dec!(0.01)
        );
        assert!(constraints.equity.max_order_size.is_none());
    }

    #[test]
    fn unconstrained_has_zero_lot() {
        let constraints = BrokerConstraints::unconstrained();
        assert_eq!(constraints.crypto.lot_size, Decimal::ZERO);
        assert_eq!(constraints.crypto.max_order_size, None);
    }
}
