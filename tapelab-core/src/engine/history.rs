//! Per-instrument market history with feed-level adjustment factors.
//!
//! Delivered bars are immutable. Retroactive split rescaling is expressed
//! by a standing multiplicative factor: each bar remembers the cumulative
//! factor in effect when it was delivered, and an adjusted view scales raw
//! prices by `factor_now / factor_at_delivery`. After a 2:1 split the
//! factor halves, so every previously delivered price reads at half its
//! raw value and the series stays continuous with post-split bars.

use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct MarketHistory {
    symbol: String,
    bars: Vec<Bar>,
    // Cumulative adjustment factor at delivery time, parallel to `bars`.
    delivery_factors: Vec<f64>,
    cum_factor: f64,
}

impl MarketHistory {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
            delivery_factors: Vec::new(),
            cum_factor: 1.0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn record(&mut self, bar: Bar) {
        self.bars.push(bar);
        self.delivery_factors.push(self.cum_factor);
    }

    /// Register a split of `ratio` new shares per old share. All
    /// previously delivered prices now read divided by `ratio`.
    pub fn apply_split(&mut self, ratio: f64) {
        self.cum_factor /= ratio;
    }

    /// The raw bar as delivered by the feed.
    pub fn bar(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    fn adjustment(&self, index: usize) -> f64 {
        self.cum_factor / self.delivery_factors[index]
    }

    pub fn adjusted_open(&self, index: usize) -> Option<f64> {
        self.bars.get(index).map(|b| b.open * self.adjustment(index))
    }

    pub fn adjusted_close(&self, index: usize) -> Option<f64> {
        self.bars
            .get(index)
            .map(|b| b.close * self.adjustment(index))
    }

    /// Latest adjusted close — the mark for open positions.
    pub fn last_adjusted_close(&self) -> Option<f64> {
        if self.bars.is_empty() {
            None
        } else {
            self.adjusted_close(self.bars.len() - 1)
        }
    }
}
