//! Trigger checking — does a bar fill a given order, and at what raw price?
//!
//! Computes the model fill price before slippage and tick rounding.
//! Gap-throughs (the bar opens beyond the limit/stop level) are resolved
//! per the configured `GapPolicy`; no single convention is universally
//! correct, so the policy is injectable and the default is documented on
//! the enum.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Order, OrderSide, OrderType};

/// How to price a fill when the bar gaps through the limit/stop level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GapPolicy {
    /// Fill at the bar's open — the first tradeable price after the gap.
    /// For limits the open is a better price than the limit; for stops it
    /// is worse. This is the default because it mirrors what a resting
    /// order would actually receive.
    #[default]
    FillAtOpen,
    /// Fill at the order's own price level even when the bar gapped
    /// through it (optimistic for stops, pessimistic for limits).
    FillAtLimit,
}

/// Result of checking one order against one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerResult {
    /// Order does not fill on this bar.
    NoTrigger,
    /// Order fills at the computed raw price.
    Fill { raw_price: f64, gap_through: bool },
}

/// Check whether `order` fills against `bar` and compute its raw price.
///
/// Slippage, tick rounding, commission, and liquidity caps are applied by
/// the caller. Eligibility (no same-tick fills) is also the caller's
/// responsibility.
pub fn check_trigger(order: &Order, bar: &Bar, gap_policy: GapPolicy) -> TriggerResult {
    match order.order_type {
        OrderType::Market => TriggerResult::Fill {
            raw_price: bar.open,
            gap_through: false,
        },
        OrderType::Limit { limit_price } => check_limit(order.side, limit_price, bar, gap_policy),
        OrderType::Stop { stop_price } => check_stop(order.side, stop_price, bar, gap_policy),
    }
}

/// Buy limit: fills if the bar trades at or below the limit.
/// Sell limit: fills if the bar trades at or above the limit.
/// A favorable gap fills at the open under `FillAtOpen`.
fn check_limit(side: OrderSide, limit: f64, bar: &Bar, gap_policy: GapPolicy) -> TriggerResult {
    match side {
        OrderSide::Buy => {
            if bar.low <= limit {
                let gap_through = bar.open <= limit;
                let raw_price = match (gap_through, gap_policy) {
                    (true, GapPolicy::FillAtOpen) => bar.open,
                    _ => limit,
                };
                TriggerResult::Fill {
                    raw_price,
                    gap_through,
                }
            } else {
                TriggerResult::NoTrigger
            }
        }
        OrderSide::Sell => {
            if bar.high >= limit {
                let gap_through = bar.open >= limit;
                let raw_price = match (gap_through, gap_policy) {
                    (true, GapPolicy::FillAtOpen) => bar.open,
                    _ => limit,
                };
                TriggerResult::Fill {
                    raw_price,
                    gap_through,
                }
            } else {
                TriggerResult::NoTrigger
            }
        }
    }
}

/// Buy stop: triggers if the bar trades at or above the stop.
/// Sell stop: triggers if the bar trades at or below the stop.
/// An adverse gap fills at the open under `FillAtOpen`.
fn check_stop(side: OrderSide, stop: f64, bar: &Bar, gap_policy: GapPolicy) -> TriggerResult {
    match side {
        OrderSide::Buy => {
            if bar.high >= stop {
                let gap_through = bar.open >= stop;
                let raw_price = match (gap_through, gap_policy) {
                    (true, GapPolicy::FillAtOpen) => bar.open,
                    _ => stop,
                };
                TriggerResult::Fill {
                    raw_price,
                    gap_through,
                }
            } else {
                TriggerResult::NoTrigger
            }
        }
        OrderSide::Sell => {
            if bar.low <= stop {
                let gap_through = bar.open <= stop;
                let raw_price = match (gap_through, gap_policy) {
                    (true, GapPolicy::FillAtOpen) => bar.open,
                    _ => stop,
                };
                TriggerResult::Fill {
                    raw_price,
                    gap_through,
                }
            } else {
                TriggerResult::NoTrigger
            }
        }
    }
}
