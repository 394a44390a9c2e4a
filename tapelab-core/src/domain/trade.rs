//! Realized-P&L events, the unit of trade-level statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One realized-P&L event: a position decrease that closed `quantity`
/// shares against their average cost basis.
///
/// A round trip closed in several partial exits produces several records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    /// Closed quantity, always positive.
    pub quantity: f64,
    /// Average cost basis the closed shares carried.
    pub entry_price: f64,
    /// Fill price that closed them.
    pub exit_price: f64,
    /// Realized P&L before commission.
    pub pnl: f64,
    pub timestamp: DateTime<Utc>,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
