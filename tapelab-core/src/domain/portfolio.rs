//! Portfolio — aggregate state of cash + all open positions.

use std::collections::HashMap;

use super::position::Position;

/// Aggregate portfolio state: the single source of truth for the account.
///
/// The equity accounting identity must hold at every tick:
/// `equity == cash + sum(position quantity * mark)`.
///
/// Cash and positions are mutated only by `engine::accounting` — through
/// fills, dividends, and splits. Strategies see read-only snapshots.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    pub positions: HashMap<String, Position>,
    pub realized_pnl: f64,
    pub total_commission: f64,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            positions: HashMap::new(),
            realized_pnl: 0.0,
            total_commission: 0.0,
        }
    }

    /// Total equity = cash + sum of all position market values at `marks`.
    /// Positions without a mark fall back to their cost basis.
    pub fn equity(&self, marks: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .map(|pos| {
                let mark = marks.get(&pos.symbol).copied().unwrap_or(pos.avg_cost);
                pos.market_value(mark)
            })
            .sum();
        self.cash + position_value
    }

    pub fn unrealized_pnl(&self, marks: &HashMap<String, f64>) -> f64 {
        self.positions
            .values()
            .map(|pos| {
                let mark = marks.get(&pos.symbol).copied().unwrap_or(pos.avg_cost);
                pos.unrealized_pnl(mark)
            })
            .sum()
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Signed held quantity, zero when flat.
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).map_or(0.0, |p| p.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_with_no_positions() {
        let portfolio = Portfolio::new(100_000.0);
        assert_eq!(portfolio.equity(&HashMap::new()), 100_000.0);
    }

    #[test]
    fn equity_with_position() {
        let mut portfolio = Portfolio::new(90_000.0);
        portfolio
            .positions
            .insert("SPY".into(), Position::new("SPY", 100.0, 100.0));
        let mut marks = HashMap::new();
        marks.insert("SPY".into(), 110.0);
        // 90_000 + 100 * 110 = 101_000
        assert_eq!(portfolio.equity(&marks), 101_000.0);
        assert_eq!(portfolio.unrealized_pnl(&marks), 1_000.0);
    }

    #[test]
    fn missing_mark_falls_back_to_cost() {
        let mut portfolio = Portfolio::new(0.0);
        portfolio
            .positions
            .insert("SPY".into(), Position::new("SPY", 10.0, 50.0));
        assert_eq!(portfolio.equity(&HashMap::new()), 500.0);
    }
}
