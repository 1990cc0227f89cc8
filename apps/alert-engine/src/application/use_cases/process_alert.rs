//! Process Alert Use Case
//!
//! The alert-to-order pipeline: validate, classify, size, constrain, place.
//! Validation runs before any broker call, so a malformed alert never
//! reaches the broker. Each run is independent; nothing is shared between
//! alerts except the immutable settings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::application::error::PipelineError;
use crate::application::ports::BrokerPort;
use crate::domain::alert::{ValidationError, validate};
use crate::domain::classification::{AssetClass, TradeType, classify};
use crate::domain::orders::{ClientOrderId, OrderRequest, OrderSide};
use crate::domain::sizing::{
    BrokerConstraints, SizingParams, SizingStrategy, apply_constraints, calculate_size,
};

/// Immutable sizing and id settings for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Sizing strategy.
    pub strategy: SizingStrategy,
    /// Strategy parameters.
    pub params: SizingParams,
    /// Per-asset-class constraints.
    pub constraints: BrokerConstraints,
    /// Prefix for generated client order ids.
    pub client_order_id_prefix: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            strategy: SizingStrategy::SignalProvided,
            params: SizingParams::default(),
            constraints: BrokerConstraints::default(),
            client_order_id_prefix: "tv".to_string(),
        }
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertReceipt {
    /// Broker-assigned order id.
    pub order_id: String,
    /// Generated client order id.
    pub client_order_id: ClientOrderId,
    /// Symbol as sent by the alert.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Quantity after constraints.
    pub quantity: Decimal,
    /// Inferred asset class.
    pub asset_class: AssetClass,
    /// Inferred trade type.
    pub trade_type: TradeType,
    /// When the alert entered the pipeline.
    pub received_at: DateTime<Utc>,
}

/// Use case turning one raw alert into one market order.
pub struct ProcessAlertUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
    settings: PipelineSettings,
}

impl<B> ProcessAlertUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new ProcessAlertUseCase.
    pub const fn new(broker: Arc<B>, settings: PipelineSettings) -> Self {
        Self { broker, settings }
    }

    /// Pipeline settings.
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the pipeline for one raw alert.
    ///
    /// # Errors
    ///
    /// `PipelineError::Validation` for a malformed alert or a sized quantity
    /// that is not positive, broker variants for gateway failures.
    pub async fn execute(&self, raw: &Value) -> Result<AlertReceipt, PipelineError> {
        let received_at = Utc::now();

        let alert = validate(raw).inspect_err(|e| {
            tracing::warn!(error = %e, field = e.field(), "Alert rejected");
        })?;
        let classified = classify(alert);

        if !self.broker.connect().await {
            tracing::error!(symbol = %classified.alert.symbol, "Broker unreachable, alert dropped");
            return Err(PipelineError::broker_unreachable());
        }

        let equity = if self.settings.strategy.requires_equity() {
            self.broker.get_account_info().await?.equity
        } else {
            Decimal::ZERO
        };

        let raw_quantity = calculate_size(
            &classified,
            equity,
            self.settings.strategy,
            &self.settings.params,
        );
        let quantity = apply_constraints(
            raw_quantity,
            classified.asset_class,
            &self.settings.constraints,
        );
        if quantity <= Decimal::ZERO {
            tracing::warn!(
                symbol = %classified.alert.symbol,
                raw_quantity = %raw_quantity,
                quantity = %quantity,
                "Sized quantity is not positive"
            );
            return Err(ValidationError::NonPositiveQuantity { quantity }.into());
        }

        let client_order_id = ClientOrderId::generate(
            &self.settings.client_order_id_prefix,
            received_at.timestamp_millis(),
        );
        let request = OrderRequest::market(
            classified.alert.symbol.clone(),
            classified.alert.strategy_order_action,
            quantity,
            client_order_id.clone(),
        );

        let order = self
            .broker
            .place_market_order(&request)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    symbol = %request.symbol,
                    client_order_id = %request.client_order_id,
                    error = %e,
                    "Order placement failed"
                );
            })?;

        tracing::info!(
            order_id = %order.id,
            client_order_id = %client_order_id,
            symbol = %request.symbol,
            side = %request.side,
            quantity = %request.quantity,
            trade_type = %classified.trade_type,
            "Placed market order"
        );

        Ok(AlertReceipt {
            order_id: order.id,
            client_order_id,
            symbol: request.symbol,
            side: request.side,
            quantity,
            asset_class: classified.asset_class,
            trade_type: classified.trade_type,
            received_at,
        })
    }
}
