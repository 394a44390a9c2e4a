//! Performance metrics — pure functions over the run's outputs.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. No side effects on the engine or its result.

use serde::{Deserialize, Serialize};
use tapelab_core::domain::TradeRecord;

/// Analyzer parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Ticks per year used for annualization. 252 for daily bars.
    pub periods_per_year: f64,
    /// Annualized risk-free rate for the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252.0,
            risk_free_rate: 0.0,
        }
    }
}

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from an equity curve and trade list.
    pub fn compute(equity_curve: &[f64], trades: &[TradeRecord], config: &MetricsConfig) -> Self {
        Self {
            total_return: total_return(equity_curve),
            annualized_return: annualized_return(equity_curve, config.periods_per_year),
            volatility: volatility(equity_curve, config.periods_per_year),
            sharpe: sharpe_ratio(equity_curve, config.risk_free_rate, config.periods_per_year),
            max_drawdown: max_drawdown(equity_curve),
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            avg_win: avg_win(trades),
            avg_loss: avg_loss(trades),
            profit_factor: profit_factor(trades),
        }
    }
}

// ─── Equity-curve metrics ───────────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    let final_eq = *equity_curve.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_eq - initial) / initial
}

/// Compound annual growth rate over the curve's length.
///
/// Returns 0.0 for degenerate curves (fewer than 2 points, non-positive
/// endpoints).
pub fn annualized_return(equity_curve: &[f64], periods_per_year: f64) -> f64 {
    if equity_curve.len() < 2 || periods_per_year <= 0.0 {
        return 0.0;
    }
    let initial = equity_curve[0];
    let final_eq = *equity_curve.last().unwrap();
    if initial <= 0.0 || final_eq <= 0.0 {
        return 0.0;
    }
    let years = (equity_curve.len() - 1) as f64 / periods_per_year;
    if years <= 0.0 {
        return 0.0;
    }
    (final_eq / initial).powf(1.0 / years) - 1.0
}

/// Per-tick simple returns of the equity curve.
pub fn periodic_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Annualized standard deviation of per-tick returns.
pub fn volatility(equity_curve: &[f64], periods_per_year: f64) -> f64 {
    let returns = periodic_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    std_dev(&returns) * periods_per_year.sqrt()
}

/// Annualized Sharpe ratio of per-tick excess returns.
///
/// Sharpe = mean(returns - rf_per_period) / std(returns) * sqrt(periods).
/// Returns 0.0 if variance is zero or fewer than 2 returns.
pub fn sharpe_ratio(equity_curve: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    let returns = periodic_returns(equity_curve);
    if returns.len() < 2 || periods_per_year <= 0.0 {
        return 0.0;
    }
    let rf_per_period = risk_free_rate / periods_per_year;
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_per_period).collect();
    let mean = mean_f64(&excess);
    let std = std_dev(&excess);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * periods_per_year.sqrt()
}

/// Maximum drawdown as a negative fraction (-0.15 = 15% peak-to-trough).
///
/// Returns 0.0 for constant or monotonically increasing curves.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

// ─── Trade-level metrics ────────────────────────────────────────────

/// Fraction of realized-P&L events that were winners.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Mean P&L of winning trades; 0.0 when there are none.
pub fn avg_win(trades: &[TradeRecord]) -> f64 {
    let wins: Vec<f64> = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).collect();
    if wins.is_empty() {
        0.0
    } else {
        mean_f64(&wins)
    }
}

/// Mean P&L of losing trades (a negative number); 0.0 when there are none.
pub fn avg_loss(trades: &[TradeRecord]) -> f64 {
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl)
        .collect();
    if losses.is_empty() {
        0.0
    } else {
        mean_f64(&losses)
    }
}

/// Gross profits / gross losses. Capped at 100.0 when losses are zero.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| -t.pnl)
        .sum();
    if gross_loss < 1e-15 {
        if gross_profit > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (gross_profit / gross_loss).min(100.0)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
