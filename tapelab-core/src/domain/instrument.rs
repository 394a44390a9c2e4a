//! Instrument metadata: tick size, lot size, currency.

use serde::{Deserialize, Serialize};

use super::order::OrderSide;

/// Static instrument metadata. Immutable once registered with a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: f64,
    pub lot_size: f64,
    pub currency: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        tick_size: f64,
        lot_size: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size,
            lot_size,
            currency: currency.into(),
        }
    }

    /// Penny-tick, single-share-lot USD equity.
    pub fn us_equity(symbol: impl Into<String>) -> Self {
        Self::new(symbol, 0.01, 1.0, "USD")
    }
}

/// Round a price to the instrument tick grid in the adverse direction:
/// buys round up, sells round down.
pub fn round_to_tick(price: f64, tick_size: f64, side: OrderSide) -> f64 {
    if tick_size <= 0.0 {
        return price;
    }
    let ticks = price / tick_size;
    let rounded = match side {
        OrderSide::Buy => ticks.ceil(),
        OrderSide::Sell => ticks.floor(),
    };
    rounded * tick_size
}
