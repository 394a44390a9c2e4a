//! Cost models — slippage and commission.
//!
//! Slippage is adverse-directional: buyers pay a higher price, sellers
//! receive a lower one. Tick rounding is applied after slippage, also in
//! the adverse direction. Commission is deducted from cash at fill time.

use serde::{Deserialize, Serialize};

use crate::domain::{round_to_tick, OrderSide};

use super::super::state::ConfigError;

/// Price adjustment between the model fill price and the executed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlippageModel {
    /// Frictionless fills.
    None,
    /// Multiplicative: price moves against the order by `bps` basis points.
    BasisPoints { bps: f64 },
    /// Additive: price moves against the order by a fixed amount per unit.
    PerUnit { amount: f64 },
}

impl SlippageModel {
    /// Slip a raw fill price against `side`.
    pub fn apply(&self, raw_price: f64, side: OrderSide) -> f64 {
        let adverse = match self {
            SlippageModel::None => 0.0,
            SlippageModel::BasisPoints { bps } => raw_price * (bps / 10_000.0),
            SlippageModel::PerUnit { amount } => *amount,
        };
        raw_price + side.sign() * adverse
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = match self {
            SlippageModel::None => true,
            SlippageModel::BasisPoints { bps } => bps.is_finite() && *bps >= 0.0,
            SlippageModel::PerUnit { amount } => amount.is_finite() && *amount >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidSlippage(format!("{self:?}")))
        }
    }
}

/// Fee charged per fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommissionModel {
    None,
    /// Flat fee per fill event, regardless of size.
    PerFill { fee: f64 },
    /// Fee per share/contract.
    PerShare { fee: f64 },
    /// Fraction of traded notional, in basis points.
    BasisPoints { bps: f64 },
}

impl CommissionModel {
    pub fn commission(&self, quantity: f64, price: f64) -> f64 {
        match self {
            CommissionModel::None => 0.0,
            CommissionModel::PerFill { fee } => *fee,
            CommissionModel::PerShare { fee } => fee * quantity,
            CommissionModel::BasisPoints { bps } => price * quantity * (bps / 10_000.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = match self {
            CommissionModel::None => true,
            CommissionModel::PerFill { fee } | CommissionModel::PerShare { fee } => {
                fee.is_finite() && *fee >= 0.0
            }
            CommissionModel::BasisPoints { bps } => bps.is_finite() && *bps >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidCommission(format!("{self:?}")))
        }
    }
}

/// Slip a raw price, then round to the instrument tick grid, both in the
/// adverse direction. Returns the final executable price.
pub fn executed_price(
    raw_price: f64,
    side: OrderSide,
    slippage: &SlippageModel,
    tick_size: f64,
) -> f64 {
    let slipped = slippage.apply(raw_price, side);
    round_to_tick(slipped, tick_size, side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_slippage_returns_raw_price() {
        assert_eq!(SlippageModel::None.apply(100.0, OrderSide::Buy), 100.0);
        assert_eq!(SlippageModel::None.apply(100.0, OrderSide::Sell), 100.0);
    }

    #[test]
    fn bps_slippage_is_directional() {
        let model = SlippageModel::BasisPoints { bps: 10.0 };
        // 100 * (1 + 10/10000) = 100.10 for buys
        assert!((model.apply(100.0, OrderSide::Buy) - 100.10).abs() < 1e-10);
        // 100 * (1 - 10/10000) = 99.90 for sells
        assert!((model.apply(100.0, OrderSide::Sell) - 99.90).abs() < 1e-10);
    }

    #[test]
    fn per_unit_slippage_is_directional() {
        let model = SlippageModel::PerUnit { amount: 0.05 };
        assert!((model.apply(100.0, OrderSide::Buy) - 100.05).abs() < 1e-10);
        assert!((model.apply(100.0, OrderSide::Sell) - 99.95).abs() < 1e-10);
    }

    #[test]
    fn executed_price_rounds_adversely() {
        let model = SlippageModel::PerUnit { amount: 0.003 };
        // Buy: 100.003 rounds up to 100.01
        assert!((executed_price(100.0, OrderSide::Buy, &model, 0.01) - 100.01).abs() < 1e-10);
        // Sell: 99.997 rounds down to 99.99
        assert!((executed_price(100.0, OrderSide::Sell, &model, 0.01) - 99.99).abs() < 1e-10);
    }

    #[test]
    fn commission_variants() {
        assert_eq!(CommissionModel::None.commission(100.0, 50.0), 0.0);
        assert_eq!(CommissionModel::PerFill { fee: 1.0 }.commission(100.0, 50.0), 1.0);
        assert_eq!(
            CommissionModel::PerShare { fee: 0.01 }.commission(100.0, 50.0),
            1.0
        );
        // 50 * 1000 * 5/10000 = 25
        assert!(
            (CommissionModel::BasisPoints { bps: 5.0 }.commission(1_000.0, 50.0) - 25.0).abs()
                < 1e-10
        );
    }

    #[test]
    fn negative_parameters_fail_validation() {
        assert!(SlippageModel::BasisPoints { bps: -1.0 }.validate().is_err());
        assert!(SlippageModel::PerUnit { amount: f64::NAN }.validate().is_err());
        assert!(CommissionModel::PerFill { fee: -1.0 }.validate().is_err());
        assert!(CommissionModel::BasisPoints { bps: f64::INFINITY }
            .validate()
            .is_err());
        assert!(CommissionModel::PerShare { fee: 0.005 }.validate().is_ok());
    }
}
