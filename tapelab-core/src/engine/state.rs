//! Run configuration, mutable engine state, diagnostics, and the run result.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    Fill, IdGenerator, Instrument, Order, Portfolio, PortfolioSnapshot, TradeRecord,
};
use crate::fingerprint;

use super::execution::ExecutionConfig;
use super::history::MarketHistory;
use super::order_book::OrderBook;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("initial cash must be positive and finite, got {0}")]
    NonPositiveCash(f64),
    #[error("no data feeds registered")]
    NoFeeds,
    #[error("instrument '{0}' registered more than once")]
    DuplicateInstrument(String),
    #[error("feed for '{0}' has no registered instrument")]
    UnregisteredFeed(String),
    #[error("invalid commission model: {0}")]
    InvalidCommission(String),
    #[error("invalid slippage model: {0}")]
    InvalidSlippage(String),
    #[error("liquidity participation must be in (0, 1], got {0}")]
    InvalidLiquidityCap(f64),
}

/// Everything a run needs besides feeds, actions, and the strategy.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub initial_cash: f64,
    pub instruments: Vec<Instrument>,
    pub execution: ExecutionConfig,
}

impl RunConfig {
    /// Frictionless execution with the given instruments.
    pub fn new(initial_cash: f64, instruments: Vec<Instrument>) -> Self {
        Self {
            initial_cash,
            instruments,
            execution: ExecutionConfig::frictionless(),
        }
    }

    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    /// Fail-fast validation, run before the first tick.
    pub fn validate(&self, feed_symbols: &[&str]) -> Result<(), ConfigError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(ConfigError::NonPositiveCash(self.initial_cash));
        }
        if feed_symbols.is_empty() {
            return Err(ConfigError::NoFeeds);
        }

        let mut seen = HashSet::new();
        for inst in &self.instruments {
            if !seen.insert(inst.symbol.as_str()) {
                return Err(ConfigError::DuplicateInstrument(inst.symbol.clone()));
            }
        }
        for &symbol in feed_symbols {
            if !seen.contains(symbol) {
                return Err(ConfigError::UnregisteredFeed(symbol.to_string()));
            }
        }

        self.execution.validate()?;
        Ok(())
    }

    pub fn instrument_map(&self) -> HashMap<String, Instrument> {
        self.instruments
            .iter()
            .map(|i| (i.symbol.clone(), i.clone()))
            .collect()
    }
}

/// Non-fatal events accumulated over a run. Nothing is silently dropped:
/// every rejected order, expired remainder, and discarded corporate action
/// lands here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnknownActionInstrument,
    OrderRejected,
    OrderExpired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Simulated time of the event; `None` for pre-run events.
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        timestamp: Option<DateTime<Utc>>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            message: message.into(),
        }
    }
}

/// Mutable state threaded through the bar loop.
pub struct EngineState {
    pub portfolio: Portfolio,
    pub order_book: OrderBook,
    pub histories: HashMap<String, MarketHistory>,
    pub id_gen: IdGenerator,
    pub diagnostics: Vec<Diagnostic>,
    pub fills: Vec<Fill>,
    pub trades: Vec<TradeRecord>,
    pub snapshots: Vec<PortfolioSnapshot>,
}

impl EngineState {
    pub fn new(config: &RunConfig) -> Self {
        let histories = config
            .instruments
            .iter()
            .map(|i| (i.symbol.clone(), MarketHistory::new(i.symbol.clone())))
            .collect();
        Self {
            portfolio: Portfolio::new(config.initial_cash),
            order_book: OrderBook::new(),
            histories,
            id_gen: IdGenerator::new(),
            diagnostics: Vec::new(),
            fills: Vec::new(),
            trades: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Current marks: latest adjusted close per instrument that has traded.
    pub fn current_marks(&self) -> HashMap<String, f64> {
        self.histories
            .iter()
            .filter_map(|(symbol, hist)| {
                hist.last_adjusted_close().map(|c| (symbol.clone(), c))
            })
            .collect()
    }
}

/// Read-only outcome of a run: the snapshot sequence, every fill, trade,
/// and order, plus the diagnostics log. The caller persists or renders it;
/// the engine never does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub equity_curve: Vec<f64>,
    pub fills: Vec<Fill>,
    pub trades: Vec<TradeRecord>,
    pub orders: Vec<Order>,
    pub diagnostics: Vec<Diagnostic>,
    pub initial_cash: f64,
    pub final_equity: f64,
    pub tick_count: usize,
}

impl RunResult {
    /// Deterministic digest of the snapshot sequence. Two runs over
    /// identical inputs produce identical fingerprints.
    pub fn fingerprint(&self) -> String {
        fingerprint::snapshot_fingerprint(&self.snapshots)
    }
}
