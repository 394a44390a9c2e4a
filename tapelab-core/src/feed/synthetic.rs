//! Seeded synthetic price feed for tests and demos.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

use super::{DataFeed, MemoryFeed};

/// Geometric-random-walk daily bars from a fixed seed.
///
/// The full series is generated at construction, so the feed is trivially
/// restartable: the same (seed, parameters) always yields the same bars.
/// The engine itself never draws randomness.
#[derive(Debug, Clone)]
pub struct GbmFeed {
    inner: MemoryFeed,
}

impl GbmFeed {
    pub fn new(
        symbol: impl Into<String>,
        start: DateTime<Utc>,
        days: usize,
        initial_price: f64,
        daily_volatility: f64,
        drift: f64,
        seed: u64,
    ) -> Self {
        let symbol = symbol.into();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bars = Vec::with_capacity(days);
        let mut price = initial_price;

        for i in 0..days {
            let timestamp = start + Duration::days(i as i64);

            let shock: f64 = rng.gen_range(-1.0..1.0);
            let daily_return = drift + daily_volatility * shock;
            let close = (price * (1.0 + daily_return)).max(0.01);

            let open = price;
            let range = price * rng.gen_range(0.001..0.02);
            let high = open.max(close) + range;
            let low = (open.min(close) - range).max(0.01);

            let volume = (1_000_000.0 * (1.0 + daily_return.abs() * 10.0)) as u64;

            bars.push(Bar {
                symbol: symbol.clone(),
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
            price = close;
        }

        Self {
            inner: MemoryFeed::new(symbol, bars),
        }
    }
}

impl DataFeed for GbmFeed {
    fn symbol(&self) -> &str {
        self.inner.symbol()
    }

    fn peek(&self) -> Option<&Bar> {
        self.inner.peek()
    }

    fn advance(&mut self) -> Option<Bar> {
        self.inner.advance()
    }
}
