use serde::{Deserialize, Serialize};
use std::fmt;

/// Order ID, unique within a run. Assigned sequentially by the execution
/// engine so repeated runs produce identical IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ID source for a single run.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next_order: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next_order: 1 }
    }

    pub fn next_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order);
        self.next_order += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_are_sequential() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_order_id(), OrderId(1));
        assert_eq!(id_gen.next_order_id(), OrderId(2));
        assert_eq!(id_gen.next_order_id(), OrderId(3));
    }
}
