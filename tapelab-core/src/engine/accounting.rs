//! Portfolio accounting — the only writer of cash and positions.
//!
//! Fills, dividends, and splits are the three events that may mutate the
//! portfolio. Increases use weighted-average cost; decreases realize
//! `(exit − avg cost) × closed quantity` (sign-aware for shorts) and emit
//! a `TradeRecord`. A fill crossing through zero is handled as
//! close-then-open: the old position is fully realized and the residual
//! opens at the fill price.

use crate::domain::{Fill, Portfolio, Position, TradeRecord};

/// Quantities below this are treated as flat and removed from the map.
const FLAT_EPS: f64 = 1e-9;

/// Apply one fill. Returns the realized-P&L event if the fill reduced or
/// closed an existing position.
pub fn apply_fill(portfolio: &mut Portfolio, fill: &Fill) -> Option<TradeRecord> {
    portfolio.cash += fill.cash_delta();
    portfolio.total_commission += fill.commission;

    let signed_qty = fill.side.sign() * fill.quantity;

    let Some(pos) = portfolio.positions.get_mut(&fill.symbol) else {
        portfolio.positions.insert(
            fill.symbol.clone(),
            Position::new(fill.symbol.clone(), signed_qty, fill.price),
        );
        return None;
    };

    if pos.quantity.signum() == signed_qty.signum() {
        // Same direction: average in.
        let total_cost = pos.avg_cost * pos.quantity.abs() + fill.price * signed_qty.abs();
        pos.quantity += signed_qty;
        pos.avg_cost = total_cost / pos.quantity.abs();
        return None;
    }

    // Opposite direction: realize against the average cost basis.
    let closed = fill.quantity.min(pos.quantity.abs());
    let realized = (fill.price - pos.avg_cost) * closed * pos.quantity.signum();
    portfolio.realized_pnl += realized;

    let trade = TradeRecord {
        symbol: fill.symbol.clone(),
        quantity: closed,
        entry_price: pos.avg_cost,
        exit_price: fill.price,
        pnl: realized,
        timestamp: fill.timestamp,
    };

    let new_qty = pos.quantity + signed_qty;
    if new_qty.abs() <= FLAT_EPS {
        portfolio.positions.remove(&fill.symbol);
    } else if new_qty.signum() == signed_qty.signum() {
        // Crossed through zero: residual opens at the fill price.
        pos.quantity = new_qty;
        pos.avg_cost = fill.price;
    } else {
        pos.quantity = new_qty;
    }

    Some(trade)
}

/// Credit a cash dividend: `per_share × held quantity` at this instant.
/// Held quantity is signed, so a short position pays the dividend out.
/// Position quantity and cost basis are unchanged.
///
/// Returns the cash credited (zero when flat).
pub fn apply_dividend(portfolio: &mut Portfolio, symbol: &str, per_share: f64) -> f64 {
    let quantity = portfolio.quantity(symbol);
    let credit = per_share * quantity;
    portfolio.cash += credit;
    credit
}

/// Rescale a position for a split of `ratio` new shares per old share:
/// quantity multiplies, cost basis divides, total value is unchanged.
pub fn apply_split(portfolio: &mut Portfolio, symbol: &str, ratio: f64) {
    if let Some(pos) = portfolio.positions.get_mut(symbol) {
        pos.quantity *= ratio;
        pos.avg_cost /= ratio;
    }
}
