//! TapeLab Runner — performance metrics and run reports on top of the
//! core engine.
//!
//! The engine (`tapelab-core`) produces a `RunResult`; this crate turns it
//! into a `BacktestReport` with summary statistics. Metrics are pure
//! functions of the result — they never touch engine state.

pub mod metrics;
pub mod report;

pub use metrics::{MetricsConfig, PerformanceMetrics};
pub use report::{run_with_report, BacktestReport};
