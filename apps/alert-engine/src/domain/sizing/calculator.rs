//! Order size calculation and constraint enforcement.
//!
//! Sizing runs in two steps: a strategy turns the alert into a raw quantity,
//! then the asset-class constraints adjust it. Constraints apply in a fixed
//! order (floor, lot rounding, ceiling) and a value rounded below the floor
//! is left there.

use rust_decimal::{Decimal, RoundingStrategy};

use super::constraints::BrokerConstraints;
use super::strategy::{SizingParams, SizingStrategy};
use crate::domain::classification::{AssetClass, ClassifiedAlert};

// ============================================================================
// Raw Size
// ============================================================================

/// Compute the raw order quantity for an alert.
///
/// Price-based strategies return zero when the alert price is not positive
/// or when the arithmetic overflows.
#[must_use]
pub fn calculate_size(
    alert: &ClassifiedAlert,
    account_equity: Decimal,
    strategy: SizingStrategy,
    params: &SizingParams,
) -> Decimal {
    let price = alert.alert.strategy_order_price;

    let quantity = match strategy {
        SizingStrategy::SignalProvided => alert.alert.strategy_order_contracts,
        SizingStrategy::PercentOfEquity => account_equity
            .checked_mul(params.percent_of_equity)
            .and_then(|budget| divide_by_price(budget, price))
            .unwrap_or(Decimal::ZERO),
        SizingStrategy::FixedNotional => {
            divide_by_price(params.notional_amount, price).unwrap_or(Decimal::ZERO)
        }
        SizingStrategy::FixedQuantity => params.fixed_quantity,
    };

    tracing::info!(
        symbol = %alert.alert.symbol,
        strategy = %strategy,
        equity = %account_equity,
        price = %price,
        quantity = %quantity,
        "Calculated order size"
    );

    quantity
}

fn divide_by_price(amount: Decimal, price: Decimal) -> Option<Decimal> {
    if price > Decimal::ZERO {
        amount.checked_div(price)
    } else {
        Some(Decimal::ZERO)
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Adjust a raw quantity to the broker constraints of its asset class.
///
/// 1. A positive quantity below the minimum is raised to the minimum.
/// 2. With a positive lot size the quantity is rounded to the nearest lot,
///    ties to even.
/// 3. A quantity above the maximum is capped.
#[must_use]
pub fn apply_constraints(
    raw_quantity: Decimal,
    asset_class: AssetClass,
    constraints: &BrokerConstraints,
) -> Decimal {
    let limits = constraints.for_asset_class(asset_class);
    let mut quantity = raw_quantity;

    if quantity > Decimal::ZERO && quantity < limits.min_order_size {
        tracing::info!(
            asset_class = %asset_class,
            quantity = %quantity,
            min = %limits.min_order_size,
            "Order size below minimum, raising to minimum"
        );
        quantity = limits.min_order_size;
    }

    if limits.lot_size > Decimal::ZERO {
        let lots = quantity
            .checked_div(limits.lot_size)
            .map(|lots| lots.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven));
        match lots.and_then(|lots| lots.checked_mul(limits.lot_size)) {
            Some(adjusted) if adjusted != quantity => {
                tracing::info!(
                    asset_class = %asset_class,
                    from = %quantity,
                    to = %adjusted,
                    lot_size = %limits.lot_size,
                    "Rounded order size to lot size"
                );
                quantity = adjusted;
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    quantity = %quantity,
                    lot_size = %limits.lot_size,
                    "Lot rounding overflowed, keeping quantity"
                );
            }
        }
    }

    if let Some(max) = limits.max_order_size.filter(|max| quantity > *max) {
        tracing::info!(
            asset_class = %asset_class,
            quantity = %quantity,
            max = %max,
            "Order size above maximum, capping"
        );
        quantity = max;
    }

    quantity
}
