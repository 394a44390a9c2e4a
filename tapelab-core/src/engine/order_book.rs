//! Order book — owns every order from submission to terminal status.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::{Order, OrderId, OrderStatus};

#[derive(Debug, Error)]
pub enum OrderBookError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {0} cannot be modified in status {1:?}")]
    InvalidStatus(OrderId, OrderStatus),
}

/// All orders of a run, keyed by ID.
///
/// Backed by a `BTreeMap` so every iteration is in ID order — submission
/// order — which keeps fill sequencing deterministic across runs.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Active orders for one symbol, in submission order.
    pub fn active_for_symbol(&self, symbol: &str) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.is_active() && o.symbol == symbol)
            .cloned()
            .collect()
    }

    /// IDs of all currently active orders, in submission order.
    pub fn active_ids(&self) -> Vec<OrderId> {
        self.orders
            .values()
            .filter(|o| o.is_active())
            .map(|o| o.id)
            .collect()
    }

    /// Record an execution of `quantity` against an active order.
    pub fn record_fill(&mut self, id: OrderId, quantity: f64) -> Result<(), OrderBookError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(OrderBookError::OrderNotFound(id))?;
        if !order.is_active() {
            return Err(OrderBookError::InvalidStatus(id, order.status.clone()));
        }
        order.filled_quantity += quantity;
        order.status = if order.remaining_quantity() <= 1e-9 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        Ok(())
    }

    pub fn reject(&mut self, id: OrderId, reason: impl Into<String>) -> Result<(), OrderBookError> {
        self.transition(id, OrderStatus::Rejected {
            reason: reason.into(),
        })
    }

    pub fn cancel(&mut self, id: OrderId, reason: impl Into<String>) -> Result<(), OrderBookError> {
        self.transition(id, OrderStatus::Cancelled {
            reason: reason.into(),
        })
    }

    pub fn expire(&mut self, id: OrderId) -> Result<(), OrderBookError> {
        self.transition(id, OrderStatus::Expired)
    }

    fn transition(&mut self, id: OrderId, status: OrderStatus) -> Result<(), OrderBookError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(OrderBookError::OrderNotFound(id))?;
        if order.status.is_terminal() {
            return Err(OrderBookError::InvalidStatus(id, order.status.clone()));
        }
        order.status = status;
        Ok(())
    }

    /// The full order-status log, in submission order.
    pub fn into_log(self) -> Vec<Order> {
        self.orders.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, OrderType, TimeInForce};
    use chrono::{TimeZone, Utc};

    fn order(id: u64, symbol: &str) -> Order {
        Order {
            id: OrderId(id),
            symbol: symbol.into(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: 100.0,
            filled_quantity: 0.0,
            time_in_force: TimeInForce::GoodTillCancelled,
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap(),
        }
    }

    #[test]
    fn partial_then_complete_fill() {
        let mut book = OrderBook::new();
        book.insert(order(1, "SPY"));

        book.record_fill(OrderId(1), 30.0).unwrap();
        assert_eq!(book.get(OrderId(1)).unwrap().status, OrderStatus::PartiallyFilled);

        book.record_fill(OrderId(1), 70.0).unwrap();
        assert_eq!(book.get(OrderId(1)).unwrap().status, OrderStatus::Filled);
    }

    #[test]
    fn fill_on_terminal_order_is_an_error() {
        let mut book = OrderBook::new();
        book.insert(order(1, "SPY"));
        book.reject(OrderId(1), "insufficient funds").unwrap();
        assert!(book.record_fill(OrderId(1), 10.0).is_err());
    }

    #[test]
    fn active_filter_respects_symbol_and_status() {
        let mut book = OrderBook::new();
        book.insert(order(1, "SPY"));
        book.insert(order(2, "SPY"));
        book.insert(order(3, "QQQ"));
        book.expire(OrderId(2)).unwrap();

        let active = book.active_for_symbol("SPY");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, OrderId(1));
    }

    #[test]
    fn log_preserves_submission_order() {
        let mut book = OrderBook::new();
        book.insert(order(2, "SPY"));
        book.insert(order(1, "SPY"));
        let log = book.into_log();
        assert_eq!(log[0].id, OrderId(1));
        assert_eq!(log[1].id, OrderId(2));
    }

    #[test]
    fn unknown_order_errors() {
        let mut book = OrderBook::new();
        assert!(book.cancel(OrderId(9), "nope").is_err());
    }
}
