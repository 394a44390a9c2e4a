//! Execution simulator — turns resting orders into fills against bars.
//!
//! Fill policy, stated once and enforced everywhere:
//! - An order submitted during tick T is eligible only at bars with
//!   timestamp strictly after T. A market order therefore fills at the
//!   *next* bar's open, never at prices the strategy had already seen when
//!   it decided. This is the engine's central look-ahead invariant.
//! - Limit orders fill when an eligible bar's range crosses the limit, at
//!   the limit price or better; stop orders symmetrically, at the stop or
//!   worse. Gap-throughs resolve per the configured `GapPolicy`.
//! - Slippage is adverse-directional, then tick-rounded adversely.
//!   Commission is deducted from cash with the fill.
//! - An optional liquidity cap bounds each fill to a fraction of bar
//!   volume; remainders follow the order's time-in-force.
//! - A buy whose cost (price × quantity + commission) exceeds available
//!   cash is rejected, recorded in diagnostics, and never retried.
//!
//! All fills for a bar are applied to the portfolio before the strategy
//! observes that bar's snapshot; no partial accounting state leaks out.

pub mod cost_model;
pub mod liquidity;
pub mod trigger;

pub use cost_model::{CommissionModel, SlippageModel};
pub use liquidity::LiquidityPolicy;
pub use trigger::{GapPolicy, TriggerResult};

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Bar, Fill, IdGenerator, Instrument, Order, OrderId, OrderRequest, OrderSide, OrderStatus,
    OrderType, Portfolio, TradeRecord,
};

use self::cost_model::executed_price;
use self::trigger::check_trigger;

use super::accounting;
use super::order_book::OrderBook;
use super::state::{ConfigError, Diagnostic, DiagnosticKind};

/// Execution-friction configuration for one run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionConfig {
    pub commission: CommissionModel,
    pub slippage: SlippageModel,
    pub gap_policy: GapPolicy,
    pub liquidity: Option<LiquidityPolicy>,
}

impl ExecutionConfig {
    pub fn frictionless() -> Self {
        Self {
            commission: CommissionModel::None,
            slippage: SlippageModel::None,
            gap_policy: GapPolicy::default(),
            liquidity: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.commission.validate()?;
        self.slippage.validate()?;
        if let Some(liq) = &self.liquidity {
            liq.validate()?;
        }
        Ok(())
    }
}

/// The execution engine. Stateless — carries only configuration; all
/// mutable state lives in the order book and the portfolio.
pub struct ExecutionEngine {
    config: ExecutionConfig,
}

impl ExecutionEngine {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Validate and book a strategy order request.
    ///
    /// Invalid requests are booked with `Rejected` status so the order log
    /// stays complete, and recorded in diagnostics. Rejection is local:
    /// the run continues.
    pub fn submit(
        &self,
        request: OrderRequest,
        now: DateTime<Utc>,
        instruments: &HashMap<String, Instrument>,
        book: &mut OrderBook,
        id_gen: &mut IdGenerator,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> OrderId {
        let id = id_gen.next_order_id();
        let rejection = validate_request(&request, instruments);

        let status = match &rejection {
            Some(reason) => OrderStatus::Rejected {
                reason: reason.clone(),
            },
            None => OrderStatus::Pending,
        };

        if let Some(reason) = &rejection {
            diagnostics.push(Diagnostic::new(
                Some(now),
                DiagnosticKind::OrderRejected,
                format!("order {id} for '{}' rejected: {reason}", request.symbol),
            ));
        }

        book.insert(Order {
            id,
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            quantity: request.quantity,
            filled_quantity: 0.0,
            time_in_force: request.time_in_force,
            status,
            created_at: now,
        });
        id
    }

    /// Resolve every eligible resting order against one bar.
    ///
    /// Market orders go first (they execute at the open, chronologically
    /// ahead of intrabar triggers), then limit/stop orders; submission
    /// order within each group. Fills mutate the portfolio immediately so
    /// later orders in the same bar see updated cash.
    pub fn process_bar(
        &self,
        bar: &Bar,
        instrument: &Instrument,
        book: &mut OrderBook,
        portfolio: &mut Portfolio,
        trades: &mut Vec<TradeRecord>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();

        let eligible: Vec<Order> = book
            .active_for_symbol(&bar.symbol)
            .into_iter()
            .filter(|o| o.eligible_at(bar.timestamp))
            .collect();

        let (market, resting): (Vec<Order>, Vec<Order>) = eligible
            .into_iter()
            .partition(|o| matches!(o.order_type, OrderType::Market));

        for order in market.into_iter().chain(resting) {
            if let Some(fill) =
                self.try_fill(&order, bar, instrument, book, portfolio, trades, diagnostics)
            {
                fills.push(fill);
            }
        }

        fills
    }

    fn try_fill(
        &self,
        order: &Order,
        bar: &Bar,
        instrument: &Instrument,
        book: &mut OrderBook,
        portfolio: &mut Portfolio,
        trades: &mut Vec<TradeRecord>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Fill> {
        let TriggerResult::Fill { raw_price, .. } =
            check_trigger(order, bar, self.config.gap_policy)
        else {
            return None;
        };

        let price = executed_price(
            raw_price,
            order.side,
            &self.config.slippage,
            instrument.tick_size,
        );

        let desired = order.remaining_quantity();
        let quantity = match &self.config.liquidity {
            Some(liq) => liq.constrain(desired, bar.volume).0,
            None => desired,
        };
        if quantity <= 0.0 {
            // No liquidity this bar; the order keeps resting.
            return None;
        }

        let commission = self.config.commission.commission(quantity, price);

        if order.side == OrderSide::Buy {
            let cost = price * quantity + commission;
            if cost > portfolio.cash + 1e-9 {
                let reason = format!(
                    "insufficient funds: need {cost:.2}, have {:.2}",
                    portfolio.cash
                );
                let _ = book.reject(order.id, reason.clone());
                diagnostics.push(Diagnostic::new(
                    Some(bar.timestamp),
                    DiagnosticKind::OrderRejected,
                    format!("order {} for '{}' rejected: {reason}", order.id, order.symbol),
                ));
                return None;
            }
        }

        book.record_fill(order.id, quantity).ok()?;

        let fill = Fill {
            order_id: order.id,
            symbol: order.symbol.clone(),
            side: order.side,
            quantity,
            price,
            commission,
            timestamp: bar.timestamp,
        };
        if let Some(trade) = accounting::apply_fill(portfolio, &fill) {
            trades.push(trade);
        }
        Some(fill)
    }

    /// Expire day orders at the end of their first eligible tick.
    ///
    /// A day order submitted at tick T had its chance on the first later
    /// tick where its instrument traded; whatever remains unfilled is
    /// expired and logged.
    pub fn expire_day_orders(
        &self,
        tick_symbols: &std::collections::HashSet<&str>,
        tick_time: DateTime<Utc>,
        book: &mut OrderBook,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for id in book.active_ids() {
            let Some(order) = book.get(id) else { continue };
            if order.time_in_force != crate::domain::TimeInForce::Day {
                continue;
            }
            if order.created_at >= tick_time || !tick_symbols.contains(order.symbol.as_str()) {
                continue;
            }
            let remaining = order.remaining_quantity();
            let symbol = order.symbol.clone();
            if book.expire(id).is_ok() {
                diagnostics.push(Diagnostic::new(
                    Some(tick_time),
                    DiagnosticKind::OrderExpired,
                    format!("day order {id} for '{symbol}' expired with {remaining} unfilled"),
                ));
            }
        }
    }
}

fn validate_request(
    request: &OrderRequest,
    instruments: &HashMap<String, Instrument>,
) -> Option<String> {
    let Some(instrument) = instruments.get(&request.symbol) else {
        return Some(format!("unregistered instrument '{}'", request.symbol));
    };

    if !request.quantity.is_finite() || request.quantity <= 0.0 {
        return Some(format!("invalid quantity {}", request.quantity));
    }

    if instrument.lot_size > 0.0 {
        let lots = request.quantity / instrument.lot_size;
        if (lots - lots.round()).abs() > 1e-9 {
            return Some(format!(
                "quantity {} is not a multiple of lot size {}",
                request.quantity, instrument.lot_size
            ));
        }
    }

    match request.order_type {
        OrderType::Market => None,
        OrderType::Limit { limit_price } => {
            if !limit_price.is_finite() || limit_price <= 0.0 {
                Some(format!("invalid limit price {limit_price}"))
            } else {
                None
            }
        }
        OrderType::Stop { stop_price } => {
            if !stop_price.is_finite() || stop_price <= 0.0 {
                Some(format!("invalid stop price {stop_price}"))
            } else {
                None
            }
        }
    }
}
