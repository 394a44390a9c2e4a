//! Fill — the record of an order (or part of one) executing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::OrderId;
use super::order::OrderSide;

/// One execution against one bar. Immutable once produced; an order may
/// yield several fills (partials under a liquidity cap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub price: f64,
    pub commission: f64,
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    /// Gross traded value, before commission.
    pub fn gross(&self) -> f64 {
        self.price * self.quantity
    }

    /// Signed cash delta for the portfolio: buys consume cash, sells
    /// release it; commission is always a cost.
    pub fn cash_delta(&self) -> f64 {
        -self.side.sign() * self.gross() - self.commission
    }
}
