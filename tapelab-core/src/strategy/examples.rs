//! Reference strategies: small, readable, and used heavily by the tests.

use crate::domain::{OrderRequest, OrderSide};
use crate::engine::history::MarketHistory;

use super::{Strategy, TickContext};

/// Buy a fixed quantity at market on the first tick, then hold.
#[derive(Debug)]
pub struct BuyAndHold {
    symbol: String,
    quantity: f64,
    submitted: bool,
}

impl BuyAndHold {
    pub fn new(symbol: impl Into<String>, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            submitted: false,
        }
    }
}

impl Strategy for BuyAndHold {
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Vec<OrderRequest> {
        if self.submitted || ctx.bar(&self.symbol).is_none() {
            return Vec::new();
        }
        self.submitted = true;
        vec![OrderRequest::market(
            self.symbol.clone(),
            OrderSide::Buy,
            self.quantity,
        )]
    }
}

/// Moving-average crossover on adjusted closes.
///
/// Long when the fast average is above the slow one, flat otherwise.
/// Signals are evaluated on the tick's close; fills land on the next
/// bar's open.
#[derive(Debug)]
pub struct SmaCross {
    symbol: String,
    fast: usize,
    slow: usize,
    quantity: f64,
}

impl SmaCross {
    pub fn new(symbol: impl Into<String>, fast: usize, slow: usize, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            fast,
            slow,
            quantity,
        }
    }
}

fn sma(history: &MarketHistory, period: usize) -> Option<f64> {
    let len = history.len();
    if period == 0 || len < period {
        return None;
    }
    let mut sum = 0.0;
    for i in len - period..len {
        sum += history.adjusted_close(i)?;
    }
    Some(sum / period as f64)
}

impl Strategy for SmaCross {
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Vec<OrderRequest> {
        if ctx.bar(&self.symbol).is_none() {
            return Vec::new();
        }
        let Some(history) = ctx.history(&self.symbol) else {
            return Vec::new();
        };
        let (Some(fast), Some(slow)) = (sma(history, self.fast), sma(history, self.slow)) else {
            return Vec::new();
        };

        let held = ctx
            .portfolio
            .positions
            .get(&self.symbol)
            .map_or(0.0, |p| p.quantity);

        if fast > slow && held <= 0.0 {
            vec![OrderRequest::market(
                self.symbol.clone(),
                OrderSide::Buy,
                self.quantity,
            )]
        } else if fast < slow && held > 0.0 {
            vec![OrderRequest::market(
                self.symbol.clone(),
                OrderSide::Sell,
                held,
            )]
        } else {
            Vec::new()
        }
    }
}
