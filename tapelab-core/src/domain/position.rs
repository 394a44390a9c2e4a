use serde::{Deserialize, Serialize};

/// Open position in one instrument.
///
/// `quantity` is signed: positive long, negative short. A position whose
/// quantity reaches zero is removed from the portfolio map, so `avg_cost`
/// is never observable on a flat position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: f64, avg_cost: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_cost,
        }
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    pub fn market_value(&self, mark: f64) -> f64 {
        self.quantity * mark
    }

    pub fn unrealized_pnl(&self, mark: f64) -> f64 {
        self.quantity * (mark - self.avg_cost)
    }
}
