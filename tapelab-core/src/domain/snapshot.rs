//! Per-tick portfolio snapshots — the raw material of the equity curve.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::portfolio::Portfolio;

/// One position as seen in a snapshot, marked at the tick's close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMark {
    pub quantity: f64,
    pub avg_cost: f64,
    pub mark: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
}

/// Immutable account state after all fills and adjustments for one tick.
///
/// Positions live in a `BTreeMap` so serialization is byte-stable across
/// runs — the run fingerprint hashes the serialized snapshot sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    pub positions: BTreeMap<String, PositionMark>,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub equity: f64,
}

impl PortfolioSnapshot {
    /// Capture the portfolio at `timestamp`, marked at `marks`.
    pub fn capture(
        portfolio: &Portfolio,
        marks: &HashMap<String, f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut positions = BTreeMap::new();
        for pos in portfolio.positions.values() {
            let mark = marks.get(&pos.symbol).copied().unwrap_or(pos.avg_cost);
            positions.insert(
                pos.symbol.clone(),
                PositionMark {
                    quantity: pos.quantity,
                    avg_cost: pos.avg_cost,
                    mark,
                    market_value: pos.market_value(mark),
                    unrealized_pnl: pos.unrealized_pnl(mark),
                },
            );
        }
        Self {
            timestamp,
            cash: portfolio.cash,
            positions,
            realized_pnl: portfolio.realized_pnl,
            unrealized_pnl: portfolio.unrealized_pnl(marks),
            equity: portfolio.equity(marks),
        }
    }

    /// Recompute equity from parts. Used by the identity property test:
    /// the stored `equity` must always agree with this.
    pub fn derived_equity(&self) -> f64 {
        self.cash
            + self
                .positions
                .values()
                .map(|p| p.market_value)
                .sum::<f64>()
    }
}
