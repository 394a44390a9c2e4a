//! The bar loop — one tick fully resolved before the next begins.
//!
//! Four phases per event tick:
//! 1. Corporate actions: anything effective at or before this tick, for
//!    instruments trading in it, lands on the portfolio and the feed-level
//!    adjustment factors before the bar is visible anywhere else.
//! 2. Execution: resting orders resolve against each bar in registration
//!    order; fills mutate the portfolio immediately and atomically.
//! 3. Strategy: sees all of the tick's bars plus a snapshot reflecting
//!    phases 1–2, and submits orders that become eligible on later ticks.
//! 4. Bookkeeping: day orders past their eligible tick expire, and the
//!    tick's snapshot (marked at adjusted closes) is recorded.
//!
//! The loop is strictly sequential and single-threaded; the tick boundary
//! is the only externally observable state.

use std::collections::HashSet;

use thiserror::Error;

use crate::clock::EventClock;
use crate::domain::{ActionKind, CorporateAction, PortfolioSnapshot};
use crate::feed::{DataFeed, FeedError};
use crate::strategy::{Strategy, TickContext};

use super::accounting;
use super::actions::ActionBook;
use super::execution::ExecutionEngine;
use super::state::{ConfigError, EngineState, RunConfig, RunResult};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Feed(#[from] FeedError),
}

/// Run a backtest to completion.
///
/// Fails fast on configuration errors before any tick is processed, and
/// aborts with the offending instrument and timestamps if a feed violates
/// timestamp ordering mid-run. Everything else — rejected orders, expired
/// remainders, dropped corporate actions — is recorded in the result's
/// diagnostics and the run continues.
pub fn run_backtest(
    config: &RunConfig,
    feeds: Vec<Box<dyn DataFeed>>,
    actions: Vec<CorporateAction>,
    strategy: &mut dyn Strategy,
) -> Result<RunResult, RunError> {
    let feed_symbols: Vec<&str> = feeds.iter().map(|f| f.symbol()).collect();
    config.validate(&feed_symbols)?;

    let instruments = config.instrument_map();
    let registered: HashSet<String> = instruments.keys().cloned().collect();

    let mut state = EngineState::new(config);
    let mut action_book = ActionBook::new(actions, &registered, &mut state.diagnostics);
    let execution = ExecutionEngine::new(config.execution.clone());
    let mut clock = EventClock::new(feeds);

    while let Some(tick) = clock.next_tick()? {
        // ─── Phase 1: corporate actions ───
        for bar in &tick.bars {
            for action in action_book.due(&bar.symbol, tick.time) {
                match action.kind {
                    ActionKind::Dividend { per_share } => {
                        accounting::apply_dividend(&mut state.portfolio, &bar.symbol, per_share);
                    }
                    ActionKind::Split { ratio } => {
                        accounting::apply_split(&mut state.portfolio, &bar.symbol, ratio);
                        if let Some(hist) = state.histories.get_mut(&bar.symbol) {
                            hist.apply_split(ratio);
                        }
                    }
                }
            }
        }

        // ─── Phase 2: execution ───
        for bar in &tick.bars {
            let instrument = instruments
                .get(&bar.symbol)
                .expect("feed symbols are validated against registered instruments");
            let fills = execution.process_bar(
                bar,
                instrument,
                &mut state.order_book,
                &mut state.portfolio,
                &mut state.trades,
                &mut state.diagnostics,
            );
            state.fills.extend(fills);
        }

        // ─── Phase 3: strategy ───
        for bar in &tick.bars {
            if let Some(hist) = state.histories.get_mut(&bar.symbol) {
                hist.record(bar.clone());
            }
        }
        let marks = state.current_marks();
        let snapshot = PortfolioSnapshot::capture(&state.portfolio, &marks, tick.time);

        let requests = {
            let ctx = TickContext::new(tick.time, &tick.bars, &snapshot, &state.histories);
            strategy.on_tick(&ctx)
        };
        for request in requests {
            execution.submit(
                request,
                tick.time,
                &instruments,
                &mut state.order_book,
                &mut state.id_gen,
                &mut state.diagnostics,
            );
        }

        // ─── Phase 4: bookkeeping ───
        let tick_symbols: HashSet<&str> = tick.bars.iter().map(|b| b.symbol.as_str()).collect();
        execution.expire_day_orders(
            &tick_symbols,
            tick.time,
            &mut state.order_book,
            &mut state.diagnostics,
        );

        state.snapshots.push(snapshot);
    }

    let equity_curve: Vec<f64> = state.snapshots.iter().map(|s| s.equity).collect();
    let final_equity = equity_curve.last().copied().unwrap_or(config.initial_cash);
    let tick_count = state.snapshots.len();

    let result = RunResult {
        snapshots: state.snapshots,
        equity_curve,
        fills: state.fills,
        trades: state.trades,
        orders: state.order_book.into_log(),
        diagnostics: state.diagnostics,
        initial_cash: config.initial_cash,
        final_equity,
        tick_count,
    };
    strategy.on_run_end(&result);
    Ok(result)
}
