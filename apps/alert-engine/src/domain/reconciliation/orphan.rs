//! Orphaned protective order detection.
//!
//! A protective order is orphaned when no open position exists for its
//! symbol. Stop and stop-limit orders are stop-loss candidates, limit orders
//! are take-profit candidates. Market, trailing-stop and unmodelled order
//! types are never touched.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::account::Position;
use crate::domain::orders::BrokerOrder;

/// Orphaned protective orders found in one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanSet {
    /// Stop and stop-limit orders without a position.
    pub stop_loss: Vec<BrokerOrder>,
    /// Limit orders without a position.
    pub take_profit: Vec<BrokerOrder>,
}

impl OrphanSet {
    /// Total number of orphaned orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop_loss.len() + self.take_profit.len()
    }

    /// True when nothing is orphaned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stop_loss.is_empty() && self.take_profit.is_empty()
    }
}

/// Partition open orders against the open positions.
///
/// Symbols are compared exactly as the broker reports them.
#[must_use]
pub fn find_orphans(positions: &[Position], orders: &[BrokerOrder]) -> OrphanSet {
    let covered: HashSet<&str> = positions.iter().map(|p| p.symbol.as_str()).collect();
    let mut orphans = OrphanSet::default();

    for order in orders {
        if covered.contains(order.symbol.as_str()) {
            continue;
        }

        if order.order_type.is_stop_loss() {
            tracing::info!(
                order_id = %order.id,
                symbol = %order.symbol,
                order_type = %order.order_type,
                "Identified orphaned stop-loss order"
            );
            orphans.stop_loss.push(order.clone());
        } else if order.order_type.is_take_profit() {
            tracing::info!(
                order_id = %order.id,
                symbol = %order.symbol,
                "Identified orphaned take-profit order"
            );
            orphans.take_profit.push(order.clone());
        }
    }

    orphans
}
