//! One-call run entry point: engine run + analyzer summary.

use serde::{Deserialize, Serialize};

use tapelab_core::domain::CorporateAction;
use tapelab_core::engine::{run_backtest, RunConfig, RunError, RunResult};
use tapelab_core::feed::DataFeed;
use tapelab_core::strategy::Strategy;

use crate::metrics::{MetricsConfig, PerformanceMetrics};

/// Read-only outcome of a run plus its analyzer summary. The caller
/// persists, prints, or charts it; nothing here writes anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub result: RunResult,
    pub metrics: PerformanceMetrics,
}

impl BacktestReport {
    pub fn from_result(result: RunResult, config: &MetricsConfig) -> Self {
        let metrics = PerformanceMetrics::compute(&result.equity_curve, &result.trades, config);
        Self { result, metrics }
    }
}

/// Run a backtest and compute its performance summary.
///
/// Fatal errors (bad configuration, out-of-order data) surface as
/// `RunError` before or during the run; non-fatal events are in
/// `report.result.diagnostics`.
pub fn run_with_report(
    config: &RunConfig,
    feeds: Vec<Box<dyn DataFeed>>,
    actions: Vec<CorporateAction>,
    strategy: &mut dyn Strategy,
    metrics_config: &MetricsConfig,
) -> Result<BacktestReport, RunError> {
    let result = run_backtest(config, feeds, actions, strategy)?;
    Ok(BacktestReport::from_result(result, metrics_config))
}
