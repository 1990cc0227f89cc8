//! Cleanup Orphans Use Case
//!
//! One reconciliation pass: take a positions snapshot and an open-orders
//! snapshot, find the orphaned protective orders and cancel each of them.
//! A failed cancellation is recorded and the pass moves on.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::error::PipelineError;
use crate::application::ports::BrokerPort;
use crate::domain::orders::BrokerOrder;
use crate::domain::reconciliation::find_orphans;

/// A cancellation the broker refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelFailure {
    /// Broker order id.
    pub order_id: String,
    /// Symbol of the order.
    pub symbol: String,
    /// Broker error message.
    pub message: String,
}

/// Result of one cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Stop-loss orders cancelled.
    pub stop_loss_cancelled: usize,
    /// Take-profit orders cancelled.
    pub take_profit_cancelled: usize,
    /// Cancellations that failed.
    pub failures: Vec<CancelFailure>,
    /// When the pass finished.
    pub completed_at: DateTime<Utc>,
}

impl CleanupReport {
    /// Total orders cancelled.
    #[must_use]
    pub const fn cleaned_orders(&self) -> usize {
        self.stop_loss_cancelled + self.take_profit_cancelled
    }
}

/// Use case cancelling protective orders whose position is gone.
pub struct CleanupOrphansUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
}

impl<B> CleanupOrphansUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new CleanupOrphansUseCase.
    pub const fn new(broker: Arc<B>) -> Self {
        Self { broker }
    }

    /// Run one pass.
    ///
    /// # Errors
    ///
    /// Fails only when the broker is unreachable or a snapshot cannot be
    /// fetched. Individual cancellation failures land in the report.
    pub async fn execute(&self) -> Result<CleanupReport, PipelineError> {
        if !self.broker.connect().await {
            tracing::error!("Broker unreachable, cleanup skipped");
            return Err(PipelineError::broker_unreachable());
        }

        let positions = self.broker.get_positions().await?;
        let orders = self.broker.get_orders().await?;
        let orphans = find_orphans(&positions, &orders);

        let mut failures = Vec::new();
        let stop_loss_cancelled = self
            .cancel_all(&orphans.stop_loss, "stop-loss", &mut failures)
            .await;
        let take_profit_cancelled = self
            .cancel_all(&orphans.take_profit, "take-profit", &mut failures)
            .await;

        let report = CleanupReport {
            stop_loss_cancelled,
            take_profit_cancelled,
            failures,
            completed_at: Utc::now(),
        };

        tracing::info!(
            positions = positions.len(),
            open_orders = orders.len(),
            stop_loss_cancelled = report.stop_loss_cancelled,
            take_profit_cancelled = report.take_profit_cancelled,
            failures = report.failures.len(),
            "Orphan cleanup complete"
        );

        Ok(report)
    }

    async fn cancel_all(
        &self,
        orders: &[BrokerOrder],
        kind: &'static str,
        failures: &mut Vec<CancelFailure>,
    ) -> usize {
        let mut cancelled = 0;
        for order in orders {
            match self.broker.cancel_order(&order.id).await {
                Ok(()) => {
                    cancelled += 1;
                    tracing::info!(
                        order_id = %order.id,
                        symbol = %order.symbol,
                        kind,
                        "Cancelled orphaned order"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        order_id = %order.id,
                        symbol = %order.symbol,
                        kind,
                        error = %e,
                        "Failed to cancel orphaned order"
                    );
                    failures.push(CancelFailure {
                        order_id: order.id.clone(),
                        symbol: order.symbol.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorCode;
    use crate::domain::account::{Position, PositionSide};
    use crate::domain::orders::OrderType;
    use crate::infrastructure::broker::InMemoryBroker;
    use rust_decimal_macros::dec;

    fn open(id: &str, symbol: &str, order_type: OrderType) -> BrokerOrder {
        InMemoryBroker::open_order(id, symbol, order_type)
    }

    #[tokio::test]
    async fn cancels_only_uncovered_orders() {
        let broker = Arc::new(
            InMemoryBroker::new()
                .with_position(Position::new("AAPL", dec!(10), PositionSide::Long))
                .with_order(open("1", "AAPL", OrderType::Stop))
                .with_order(open("2", "TSLA", OrderType::Limit)),
        );

        let report = CleanupOrphansUseCase::new(Arc::clone(&broker))
            .execute()
            .await
            .unwrap();

        assert_eq!(broker.cancelled_orders(), vec!["2".to_string()]);
        assert_eq!(report.stop_loss_cancelled, 0);
        assert_eq!(report.take_profit_cancelled, 1);
        assert_eq!(report.cleaned_orders(), 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn one_failed_cancel_does_not_stop_the_pass() {
        let broker = Arc::new(
            InMemoryBroker::new()
                .with_order(open("sl-1", "MSFT", OrderType::Stop))
                .with_order(open("sl-2", "MSFT", OrderType::StopLimit))
                .with_order(open("tp-1", "MSFT", OrderType::Limit))
                .failing_cancel("sl-1"),
        );

        let report = CleanupOrphansUseCase::new(Arc::clone(&broker))
            .execute()
            .await
            .unwrap();

        assert_eq!(report.stop_loss_cancelled, 1);
        assert_eq!(report.take_profit_cancelled, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].order_id, "sl-1");
        assert_eq!(
            broker.cancelled_orders(),
            vec!["sl-2".to_string(), "tp-1".to_string()]
        );
    }

    #[tokio::test]
    async fn market_and_trailing_orders_are_left_alone() {
        let broker = Arc::new(
            InMemoryBroker::new()
                .with_order(open("m", "NVDA", OrderType::Market))
                .with_order(open("t", "NVDA", OrderType::TrailingStop)),
        );

        let report = CleanupOrphansUseCase::new(Arc::clone(&broker))
            .execute()
            .await
            .unwrap();
        assert_eq!(report.cleaned_orders(), 0);
        assert!(broker.cancelled_orders().is_empty());
    }

    #[tokio::test]
    async fn unreachable_broker_fails_the_pass() {
        let broker = Arc::new(InMemoryBroker::new().unreachable());
        let err = CleanupOrphansUseCase::new(broker).execute().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BrokerConnectionFailed);
    }
}
