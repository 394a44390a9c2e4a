//! The simulation engine: execution, accounting, corporate actions, and
//! the bar loop.

pub mod accounting;
pub mod actions;
pub mod execution;
pub mod history;
pub mod order_book;
pub mod run;
pub mod state;

pub use execution::{
    CommissionModel, ExecutionConfig, ExecutionEngine, GapPolicy, LiquidityPolicy, SlippageModel,
};
pub use history::MarketHistory;
pub use order_book::{OrderBook, OrderBookError};
pub use run::{run_backtest, RunError};
pub use state::{ConfigError, Diagnostic, DiagnosticKind, EngineState, RunConfig, RunResult};
