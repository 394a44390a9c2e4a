//! Order types and the order lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1 for buys, -1 for sells. Used for signed cash/quantity deltas.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }
}

/// What kind of order and its price parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderType {
    /// Fill at the open of the first bar after submission.
    Market,
    /// Fill at `limit_price` or better once an eligible bar crosses it.
    Limit { limit_price: f64 },
    /// Triggers when an eligible bar reaches `stop_price`, then fills as market.
    Stop { stop_price: f64 },
}

/// How long an unfilled order (or unfilled remainder) rests in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Expires at the end of the first bar on which the order was eligible.
    Day,
    /// Rests until filled, cancelled, or the run ends.
    GoodTillCancelled,
}

/// Order lifecycle states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting for an eligible bar.
    Pending,
    /// Some quantity filled, remainder still resting.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Cancelled with a reason.
    Cancelled { reason: String },
    /// Failed validation or funding; never entered the book as live.
    Rejected { reason: String },
    /// Day order (or remainder) that ran out of time.
    Expired,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Cancelled { .. }
                | OrderStatus::Rejected { .. }
                | OrderStatus::Expired
        )
    }
}

/// A single order in the book.
///
/// Owned by the execution engine from submission until terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub filled_quantity: f64,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn remaining_quantity(&self) -> f64 {
        self.quantity - self.filled_quantity
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Pending | OrderStatus::PartiallyFilled
        )
    }

    /// An order only becomes eligible for execution strictly after the tick
    /// that created it. Filling against the submission bar would let the
    /// strategy trade on prices it has already seen.
    pub fn eligible_at(&self, bar_time: DateTime<Utc>) -> bool {
        self.is_active() && bar_time > self.created_at
    }
}

/// Strategy-facing order form. The execution engine assigns the ID and
/// timestamps on submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: f64,
        limit_price: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit { limit_price },
            quantity,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    pub fn stop(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: f64,
        stop_price: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Stop { stop_price },
            quantity,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    pub fn day(mut self) -> Self {
        self.time_in_force = TimeInForce::Day;
        self
    }
}
