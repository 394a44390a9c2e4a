//! Vec-backed feed — the canonical ingestion boundary.

use crate::domain::Bar;

use super::DataFeed;

/// Feed over a pre-parsed, in-memory bar sequence.
///
/// This is the shape external data loaders hand to the engine: the core
/// performs no file or network I/O itself.
#[derive(Debug, Clone)]
pub struct MemoryFeed {
    symbol: String,
    bars: Vec<Bar>,
    cursor: usize,
}

impl MemoryFeed {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl DataFeed for MemoryFeed {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn peek(&self) -> Option<&Bar> {
        self.bars.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Bar> {
        let bar = self.bars.get(self.cursor).cloned();
        if bar.is_some() {
            self.cursor += 1;
        }
        bar
    }
}
