//! Liquidity constraint — participation limit against bar volume.
//!
//! When enabled, a single bar fills at most `max_participation` of its
//! volume per order. The unfilled remainder stays in the book and is
//! governed by the order's time-in-force: day remainders expire at the end
//! of the order's first eligible bar, good-till-cancelled remainders keep
//! resting.

use serde::{Deserialize, Serialize};

use super::super::state::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPolicy {
    /// Maximum participation rate as a fraction of bar volume (0.0 to 1.0].
    /// Example: 0.10 fills at most 10% of the bar's volume.
    pub max_participation: f64,
}

impl LiquidityPolicy {
    pub fn new(max_participation: f64) -> Self {
        Self { max_participation }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_participation.is_finite()
            && self.max_participation > 0.0
            && self.max_participation <= 1.0
        {
            Ok(())
        } else {
            Err(ConfigError::InvalidLiquidityCap(self.max_participation))
        }
    }

    /// Apply the constraint to a desired fill quantity.
    ///
    /// Returns `(fill_qty, remainder_qty)`; `remainder_qty` is zero when
    /// the constraint does not bind.
    pub fn constrain(&self, desired_qty: f64, bar_volume: u64) -> (f64, f64) {
        let max_qty = (bar_volume as f64 * self.max_participation).floor();
        if desired_qty <= max_qty {
            (desired_qty, 0.0)
        } else {
            (max_qty, desired_qty - max_qty)
        }
    }
}
