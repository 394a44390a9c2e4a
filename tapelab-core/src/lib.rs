//! TapeLab Core — event-driven backtesting engine.
//!
//! This crate is the simulation core:
//! - Domain types (bars, instruments, orders, fills, positions, snapshots)
//! - Pull-based event clock merging N feeds into one deterministic stream
//! - Corporate-action handling with feed-level adjustment factors
//! - Execution simulation (next-bar-open markets, range-triggered
//!   limit/stop, slippage, commission, liquidity-capped partials)
//! - Portfolio accounting with weighted-average cost and realized P&L
//! - The strategy boundary and the four-phase bar loop
//!
//! Data ingestion, persistence, and presentation are the caller's problem:
//! the engine consumes pre-parsed bar and corporate-action sequences and
//! returns a read-only `RunResult`.

pub mod clock;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod fingerprint;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: result and domain types are Send + Sync, so
    /// callers may hand finished runs to other threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Order>();
        require_sync::<domain::Order>();
        require_send::<domain::Fill>();
        require_sync::<domain::Fill>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::Portfolio>();
        require_sync::<domain::Portfolio>();
        require_send::<domain::PortfolioSnapshot>();
        require_sync::<domain::PortfolioSnapshot>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::Instrument>();
        require_sync::<domain::Instrument>();
        require_send::<domain::CorporateAction>();
        require_sync::<domain::CorporateAction>();

        require_send::<engine::RunConfig>();
        require_sync::<engine::RunConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::Diagnostic>();
        require_sync::<engine::Diagnostic>();
    }
}
