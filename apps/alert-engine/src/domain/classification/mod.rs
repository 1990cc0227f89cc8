//! Trade Classification
//!
//! Attaches an asset class and a trade type to a validated alert.

pub mod asset_class;
pub mod trade_type;

use serde::Serialize;

pub use asset_class::{AssetClass, classify_asset_class};
pub use trade_type::{TradeType, classify_trade_type};

use super::alert::NormalizedAlert;

/// A normalized alert plus its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedAlert {
    /// The validated alert.
    #[serde(flatten)]
    pub alert: NormalizedAlert,
    /// Asset class inferred from the symbol.
    pub asset_class: AssetClass,
    /// Trade type inferred from the order id and action.
    pub trade_type: TradeType,
}

/// Classify a validated alert.
#[must_use]
pub fn classify(alert: NormalizedAlert) -> ClassifiedAlert {
    let asset_class = classify_asset_class(&alert.symbol);
    let trade_type = classify_trade_type(&alert.strategy_order_id, alert.strategy_order_action);

    tracing::info!(
        symbol = %alert.symbol,
        asset_class = %asset_class,
        trade_type = %trade_type,
        "Classified alert"
    );

    ClassifiedAlert {
        alert,
        asset_class,
        trade_type,
    }
}
