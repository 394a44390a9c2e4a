//! Property tests for metric invariants.

use proptest::prelude::*;
use tapelab_runner::{MetricsConfig, PerformanceMetrics};

fn arb_equity_curve() -> impl Strategy<Value = Vec<f64>> {
    // Per-tick returns in ±5%, compounded from a positive start.
    prop::collection::vec(-0.05..0.05_f64, 2..300).prop_map(|returns| {
        let mut equity = 100_000.0;
        let mut curve = vec![equity];
        for r in returns {
            equity *= 1.0 + r;
            curve.push(equity);
        }
        curve
    })
}

proptest! {
    /// Drawdown is always in [-1, 0] for positive equity curves.
    #[test]
    fn drawdown_is_bounded(curve in arb_equity_curve()) {
        let dd = tapelab_runner::metrics::max_drawdown(&curve);
        prop_assert!(dd <= 0.0);
        prop_assert!(dd > -1.0);
    }

    /// Total return is consistent with the curve's endpoints.
    #[test]
    fn total_return_matches_endpoints(curve in arb_equity_curve()) {
        let tr = tapelab_runner::metrics::total_return(&curve);
        let expected = (curve.last().unwrap() - curve[0]) / curve[0];
        prop_assert!((tr - expected).abs() < 1e-12);
    }

    /// Every aggregate metric is finite for well-formed inputs.
    #[test]
    fn metrics_are_finite(curve in arb_equity_curve()) {
        let metrics = PerformanceMetrics::compute(&curve, &[], &MetricsConfig::default());
        prop_assert!(metrics.total_return.is_finite());
        prop_assert!(metrics.annualized_return.is_finite());
        prop_assert!(metrics.volatility.is_finite());
        prop_assert!(metrics.sharpe.is_finite());
        prop_assert!(metrics.max_drawdown.is_finite());
    }

    /// A monotonically rising curve has zero drawdown and positive return.
    #[test]
    fn rising_curve_has_no_drawdown(step in 0.0001..0.01_f64, n in 3..200usize) {
        let curve: Vec<f64> = (0..n).map(|i| 100.0 * (1.0 + step).powi(i as i32)).collect();
        prop_assert_eq!(tapelab_runner::metrics::max_drawdown(&curve), 0.0);
        prop_assert!(tapelab_runner::metrics::total_return(&curve) > 0.0);
    }
}
