//! In-memory broker for tests and local runs.
//!
//! Holds seeded account, position and order state behind a mutex and can be
//! told to fail in specific ways: unreachable, rejecting new orders, failing
//! the account call, or refusing to cancel particular order ids.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::account::{AccountInfo, Position};
use crate::domain::orders::{BrokerOrder, OrderRequest, OrderSide, OrderType};

/// Statuses that count as open when listing orders.
const CLOSED_STATUSES: [&str; 5] = ["filled", "canceled", "expired", "rejected", "replaced"];

#[derive(Debug)]
struct State {
    reachable: bool,
    account: AccountInfo,
    account_error: Option<BrokerError>,
    reject_reason: Option<String>,
    positions: Vec<Position>,
    orders: Vec<BrokerOrder>,
    failing_cancels: HashSet<String>,
    placed: Vec<OrderRequest>,
    cancelled: Vec<String>,
    calls: usize,
    next_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            reachable: true,
            account: AccountInfo {
                id: "in-memory".to_string(),
                equity: dec!(100000),
                cash: dec!(100000),
                buying_power: dec!(100000),
            },
            account_error: None,
            reject_reason: None,
            positions: Vec::new(),
            orders: Vec::new(),
            failing_cancels: HashSet::new(),
            placed: Vec::new(),
            cancelled: Vec::new(),
            calls: 0,
            next_id: 1,
        }
    }
}

/// Deterministic `BrokerPort` backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryBroker {
    state: Mutex<State>,
}

impl InMemoryBroker {
    /// Reachable broker with 100,000 equity and no positions or orders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an open protective order for seeding.
    #[must_use]
    pub fn open_order(id: &str, symbol: &str, order_type: OrderType) -> BrokerOrder {
        BrokerOrder {
            id: id.to_string(),
            client_order_id: None,
            symbol: symbol.to_string(),
            side: OrderSide::Sell,
            order_type,
            status: "new".to_string(),
            qty: Some(Decimal::ONE),
            filled_qty: Decimal::ZERO,
            created_at: None,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set account equity.
    #[must_use]
    pub fn with_equity(mut self, equity: Decimal) -> Self {
        let account = &mut self.state_mut().account;
        account.equity = equity;
        account.cash = equity;
        account.buying_power = equity;
        self
    }

    /// Seed an open position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.state_mut().positions.push(position);
        self
    }

    /// Seed an order.
    #[must_use]
    pub fn with_order(mut self, order: BrokerOrder) -> Self {
        self.state_mut().orders.push(order);
        self
    }

    /// Make `connect` return false and every call fail with a connection error.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.state_mut().reachable = false;
        self
    }

    /// Reject every new order with `reason`.
    #[must_use]
    pub fn rejecting_orders(mut self, reason: &str) -> Self {
        self.state_mut().reject_reason = Some(reason.to_string());
        self
    }

    /// Fail `get_account_info` with `error`.
    #[must_use]
    pub fn failing_account_info(mut self, error: BrokerError) -> Self {
        self.state_mut().account_error = Some(error);
        self
    }

    /// Fail cancellation of one order id.
    #[must_use]
    pub fn failing_cancel(mut self, order_id: &str) -> Self {
        self.state_mut().failing_cancels.insert(order_id.to_string());
        self
    }

    /// Toggle reachability at runtime.
    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    /// Replace the open positions at runtime.
    pub fn set_positions(&self, positions: Vec<Position>) {
        self.state().positions = positions;
    }

    /// Requests passed to `place_market_order`, in order.
    #[must_use]
    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.state().placed.clone()
    }

    /// Ids successfully cancelled, in order.
    #[must_use]
    pub fn cancelled_orders(&self) -> Vec<String> {
        self.state().cancelled.clone()
    }

    /// Number of port calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls
    }

    fn enter(&self) -> Result<MutexGuard<'_, State>, BrokerError> {
        let mut state = self.state();
        state.calls += 1;
        if state.reachable {
            Ok(state)
        } else {
            Err(BrokerError::ConnectionError {
                message: "in-memory broker is unreachable".to_string(),
            })
        }
    }
}

fn is_open(order: &BrokerOrder) -> bool {
    !CLOSED_STATUSES.iter().any(|status| order.has_status(status))
}

#[async_trait]
impl BrokerPort for InMemoryBroker {
    async fn connect(&self) -> bool {
        self.enter().is_ok()
    }

    async fn get_account_info(&self) -> Result<AccountInfo, BrokerError> {
        let state = self.enter()?;
        match &state.account_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.account.clone()),
        }
    }

    async fn place_market_order(&self, request: &OrderRequest) -> Result<BrokerOrder, BrokerError> {
        let mut state = self.enter()?;
        if let Some(reason) = &state.reject_reason {
            return Err(BrokerError::OrderRejected {
                reason: reason.clone(),
            });
        }

        let id = format!("mem-{}", state.next_id);
        state.next_id += 1;

        let order = BrokerOrder {
            id,
            client_order_id: Some(request.client_order_id.to_string()),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: OrderType::Market,
            status: "filled".to_string(),
            qty: Some(request.quantity),
            filled_qty: request.quantity,
            created_at: Some(chrono::Utc::now()),
        };
        state.placed.push(request.clone());
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError> {
        let state = self.enter()?;
        state
            .orders
            .iter()
            .find(|order| order.id == order_id)
            .cloned()
            .ok_or_else(|| BrokerError::OrderNotFound {
                order_id: order_id.to_string(),
            })
    }

    async fn get_orders(&self) -> Result<Vec<BrokerOrder>, BrokerError> {
        let state = self.enter()?;
        Ok(state.orders.iter().filter(|o| is_open(o)).cloned().collect())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let mut state = self.enter()?;
        if state.failing_cancels.contains(order_id) {
            return Err(BrokerError::OrderRejected {
                reason: format!("order {order_id} is not cancelable"),
            });
        }

        let Some(order) = state
            .orders
            .iter_mut()
            .find(|order| order.id == order_id && is_open(order))
        else {
            return Err(BrokerError::OrderNotFound {
                order_id: order_id.to_string(),
            });
        };
        order.status = "canceled".to_string();
        state.cancelled.push(order_id.to_string());
        Ok(())
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let state = self.enter()?;
        Ok(state.positions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::PositionSide;
    use crate::domain::orders::ClientOrderId;

    #[tokio::test]
    async fn places_orders_and_records_requests() {
        let broker = InMemoryBroker::new();
        let request = OrderRequest::market(
            "AAPL",
            OrderSide::Buy,
            dec!(3),
            ClientOrderId::new("tv-1-a"),
        );

        let order = broker.place_market_order(&request).await.unwrap();
        assert_eq!(order.id, "mem-1");
        assert_eq!(order.client_order_id.as_deref(), Some("tv-1-a"));
        assert_eq!(broker.placed_orders(), vec![request]);
        // Filled market orders are not listed as open.
        assert!(broker.get_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_broker_fails_every_call() {
        let broker = InMemoryBroker::new().unreachable();
        assert!(!broker.connect().await);
        assert!(matches!(
            broker.get_positions().await,
            Err(BrokerError::ConnectionError { .. })
        ));
        assert_eq!(broker.call_count(), 2);
    }

    #[tokio::test]
    async fn cancel_marks_order_canceled() {
        let broker = InMemoryBroker::new()
            .with_order(InMemoryBroker::open_order("1", "TSLA", OrderType::Limit));

        broker.cancel_order("1").await.unwrap();
        assert_eq!(broker.cancelled_orders(), vec!["1".to_string()]);
        assert!(broker.get_orders().await.unwrap().is_empty());
        assert_eq!(broker.get_order("1").await.unwrap().status, "canceled");

        let err = broker.cancel_order("1").await.unwrap_err();
        assert!(matches!(err, BrokerError::OrderNotFound { .. }));
    }

    #[tokio::test]
    async fn failing_cancel_is_rejected() {
        let broker = InMemoryBroker::new()
            .with_order(InMemoryBroker::open_order("1", "TSLA", OrderType::Stop))
            .failing_cancel("1");

        let err = broker.cancel_order("1").await.unwrap_err();
        assert!(matches!(err, BrokerError::OrderRejected { .. }));
        assert_eq!(broker.get_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_state_is_returned() {
        let broker = InMemoryBroker::new()
            .with_equity(dec!(2500))
            .with_position(Position::new("AAPL", dec!(10), PositionSide::Long));

        assert_eq!(broker.get_account_info().await.unwrap().equity, dec!(2500));
        assert_eq!(broker.get_positions().await.unwrap().len(), 1);

        broker.set_positions(Vec::new());
        assert!(broker.get_positions().await.unwrap().is_empty());
    }
}
