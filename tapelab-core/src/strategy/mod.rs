//! Strategy boundary — the engine is agnostic to decision logic.
//!
//! A strategy is a capability, not a base class: the engine holds a
//! `&mut dyn Strategy` and calls `on_tick` once per dispatched event tick
//! with everything the strategy is allowed to see — the tick's bars, a
//! read-only portfolio snapshot, and adjusted price history. It returns
//! order requests; it never touches the portfolio directly.

pub mod examples;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{Bar, OrderRequest, PortfolioSnapshot};
use crate::engine::history::MarketHistory;
use crate::engine::state::RunResult;

pub use examples::{BuyAndHold, SmaCross};

/// Everything a strategy may observe on one tick.
pub struct TickContext<'a> {
    /// Simulated time of this tick.
    pub time: DateTime<Utc>,
    /// All bars dispatched at this timestamp, in feed registration order.
    pub bars: &'a [Bar],
    /// Account state after this tick's fills and adjustments.
    pub portfolio: &'a PortfolioSnapshot,
    histories: &'a HashMap<String, MarketHistory>,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(
        time: DateTime<Utc>,
        bars: &'a [Bar],
        portfolio: &'a PortfolioSnapshot,
        histories: &'a HashMap<String, MarketHistory>,
    ) -> Self {
        Self {
            time,
            bars,
            portfolio,
            histories,
        }
    }

    /// This tick's bar for `symbol`, if the instrument traded.
    pub fn bar(&self, symbol: &str) -> Option<&Bar> {
        self.bars.iter().find(|b| b.symbol == symbol)
    }

    /// Split-adjusted price history for `symbol`, including this tick's bar.
    pub fn history(&self, symbol: &str) -> Option<&MarketHistory> {
        self.histories.get(symbol)
    }
}

/// Decision hook invoked by the engine.
pub trait Strategy {
    /// Called once per event tick. Returned requests are validated and
    /// booked; they become eligible for execution on later ticks only.
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Vec<OrderRequest>;

    /// Called once after the last tick, with the finished result.
    fn on_run_end(&mut self, _result: &RunResult) {}
}

/// Strategy that never trades. Useful as a baseline and in tests.
#[derive(Debug, Default)]
pub struct NullStrategy;

impl Strategy for NullStrategy {
    fn on_tick(&mut self, _ctx: &TickContext<'_>) -> Vec<OrderRequest> {
        Vec::new()
    }
}
