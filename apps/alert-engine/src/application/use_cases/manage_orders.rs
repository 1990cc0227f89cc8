//! Manage Orders Use Case
//!
//! Listing with status filter and pagination, lookup and cancellation of
//! individual broker orders.

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::PipelineError;
use crate::application::ports::BrokerPort;
use crate::domain::orders::BrokerOrder;

/// Page size used when none or an out-of-range one is given.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Order listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    /// Case-insensitive status filter.
    pub status: Option<String>,
    /// Page size, 1..=100.
    pub limit: usize,
    /// Orders to skip.
    pub offset: usize,
}

impl OrderQuery {
    /// Build a query from loosely typed input. A limit outside 1..=100 falls
    /// back to the default and a negative offset becomes zero.
    #[must_use]
    pub fn new(status: Option<String>, limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|l| (1..=MAX_PAGE_LIMIT).contains(l))
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = offset.and_then(|o| usize::try_from(o).ok()).unwrap_or(0);
        let status = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            status,
            limit,
            offset,
        }
    }
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// One page of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPage {
    /// Orders on this page.
    pub orders: Vec<BrokerOrder>,
    /// Matching orders before pagination.
    pub total: usize,
    /// Page size.
    pub limit: usize,
    /// Orders skipped.
    pub offset: usize,
}

/// Use case for order lookups and manual cancellation.
pub struct ManageOrdersUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
}

impl<B> ManageOrdersUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new ManageOrdersUseCase.
    pub const fn new(broker: Arc<B>) -> Self {
        Self { broker }
    }

    async fn ensure_connected(&self) -> Result<(), PipelineError> {
        if self.broker.connect().await {
            Ok(())
        } else {
            Err(PipelineError::broker_unreachable())
        }
    }

    /// List open orders.
    ///
    /// # Errors
    ///
    /// Broker unreachable or listing failed.
    pub async fn list(&self, query: &OrderQuery) -> Result<OrderPage, PipelineError> {
        self.ensure_connected().await?;

        let orders = self.broker.get_orders().await?;
        let matching: Vec<BrokerOrder> = match &query.status {
            Some(status) => orders.into_iter().filter(|o| o.has_status(status)).collect(),
            None => orders,
        };
        let total = matching.len();
        let orders = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(OrderPage {
            orders,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Broker unreachable or the order lookup failed.
    pub async fn get(&self, order_id: &str) -> Result<BrokerOrder, PipelineError> {
        self.ensure_connected().await?;
        Ok(self.broker.get_order(order_id).await?)
    }

    /// Cancel one order.
    ///
    /// # Errors
    ///
    /// Broker unreachable or the cancellation failed.
    pub async fn cancel(&self, order_id: &str) -> Result<(), PipelineError> {
        self.ensure_connected().await?;
        self.broker.cancel_order(order_id).await?;
        tracing::info!(order_id, "Cancelled order on request");
        Ok(())
    }
}
