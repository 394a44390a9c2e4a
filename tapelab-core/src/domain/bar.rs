//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single instrument at a single timestamp.
///
/// Bars are immutable once produced by a feed. Retroactive corporate-action
/// rescaling is expressed through feed-level adjustment factors
/// (`engine::history`), never by rewriting a delivered bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLCV sanity check: high is the top of the range, low the bottom,
    /// prices positive.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Whether `price` falls inside this bar's traded range.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}
