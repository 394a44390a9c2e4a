//! Data feeds — lazy, ordered, restartable bar sources.
//!
//! A feed produces bars for exactly one instrument in non-decreasing
//! timestamp order. The clock enforces that ordering at dispatch time; a
//! violation is fatal (`FeedError::OutOfOrder`) because out-of-order data
//! silently corrupts every downstream accounting number.
//!
//! Restartability contract: constructing a fresh feed over the same source
//! must reproduce the identical bar sequence, so repeated runs are
//! bit-identical.

pub mod memory;
pub mod synthetic;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::Bar;

pub use memory::MemoryFeed;
pub use synthetic::GbmFeed;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("out-of-order bar for '{symbol}': {next} after {prev}")]
    OutOfOrder {
        symbol: String,
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },
}

/// A pull-based bar source for one instrument.
///
/// `None` from `peek`/`advance` is the exhausted sentinel; once exhausted a
/// feed stays exhausted.
pub trait DataFeed {
    /// The instrument this feed serves.
    fn symbol(&self) -> &str;

    /// Next unconsumed bar without removing it.
    fn peek(&self) -> Option<&Bar>;

    /// Remove and return the next bar.
    fn advance(&mut self) -> Option<Bar>;
}
