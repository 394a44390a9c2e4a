//! End-to-end engine scenarios with hand-computed expectations.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tapelab_core::domain::{Bar, Instrument, OrderRequest, OrderSide, OrderStatus};
use tapelab_core::engine::{
    run_backtest, CommissionModel, DiagnosticKind, ExecutionConfig, RunConfig,
};
use tapelab_core::feed::{DataFeed, MemoryFeed};
use tapelab_core::strategy::{BuyAndHold, Strategy, TickContext};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap() + Duration::days(n)
}

fn bar(symbol: &str, n: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        symbol: symbol.into(),
        timestamp: day(n),
        open,
        high,
        low,
        close,
        volume: 1_000_000,
    }
}

fn boxed(feed: MemoryFeed) -> Box<dyn DataFeed> {
    Box::new(feed)
}

/// Single instrument, 3 daily bars (closes 100, 105, 98), starting cash
/// 10,000. Buy 10 shares at market on bar 1 → fill at bar 2's open, flat
/// $1/fill commission, zero slippage.
#[test]
fn three_bar_scenario_matches_hand_computation() {
    let bars = vec![
        bar("SPY", 0, 99.0, 101.0, 98.5, 100.0),
        bar("SPY", 1, 104.0, 106.0, 103.0, 105.0),
        bar("SPY", 2, 97.0, 99.0, 96.5, 98.0),
    ];

    let mut config = RunConfig::new(10_000.0, vec![Instrument::us_equity("SPY")]);
    config.execution = ExecutionConfig {
        commission: CommissionModel::PerFill { fee: 1.0 },
        ..ExecutionConfig::frictionless()
    };

    let mut strategy = BuyAndHold::new("SPY", 10.0);
    let result = run_backtest(
        &config,
        vec![boxed(MemoryFeed::new("SPY", bars))],
        Vec::new(),
        &mut strategy,
    )
    .unwrap();

    // One fill, at bar 2's open.
    assert_eq!(result.fills.len(), 1);
    let fill = &result.fills[0];
    assert_eq!(fill.timestamp, day(1));
    assert_eq!(fill.price, 104.0);
    assert_eq!(fill.quantity, 10.0);
    assert_eq!(fill.commission, 1.0);

    // Cash after fill: 10_000 - 10*104 - 1 = 8_959.
    let snap2 = &result.snapshots[1];
    assert!((snap2.cash - 8_959.0).abs() < 1e-9);
    // Equity at bar 2: 8_959 + 10*105 = 10_009.
    assert!((snap2.equity - 10_009.0).abs() < 1e-9);

    // Bar 3: marked at 98.
    let snap3 = &result.snapshots[2];
    assert!((snap3.cash - 8_959.0).abs() < 1e-9);
    let pos = &snap3.positions["SPY"];
    assert_eq!(pos.quantity, 10.0);
    assert_eq!(pos.avg_cost, 104.0);
    assert!((pos.unrealized_pnl - (-60.0)).abs() < 1e-9);
    assert!((snap3.equity - 9_939.0).abs() < 1e-9);
    assert!((result.final_equity - 9_939.0).abs() < 1e-9);
}

#[test]
fn insufficient_cash_rejects_and_leaves_account_untouched() {
    let bars = vec![
        bar("SPY", 0, 99.0, 101.0, 98.5, 100.0),
        bar("SPY", 1, 104.0, 106.0, 103.0, 105.0),
    ];

    let config = RunConfig::new(500.0, vec![Instrument::us_equity("SPY")]);
    let mut strategy = BuyAndHold::new("SPY", 10.0);
    let result = run_backtest(
        &config,
        vec![boxed(MemoryFeed::new("SPY", bars))],
        Vec::new(),
        &mut strategy,
    )
    .unwrap();

    assert!(result.fills.is_empty());
    assert_eq!(result.orders.len(), 1);
    assert!(matches!(
        result.orders[0].status,
        OrderStatus::Rejected { .. }
    ));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::OrderRejected));

    for snap in &result.snapshots {
        assert_eq!(snap.cash, 500.0);
        assert!(snap.positions.is_empty());
        assert_eq!(snap.equity, 500.0);
    }
}

/// Same-tick orders across instruments resolve in submission order against
/// shared cash: the first buy consumes the cash, the second is rejected.
#[test]
fn shared_cash_resolves_in_deterministic_order() {
    struct BuyBoth {
        submitted: bool,
    }
    impl Strategy for BuyBoth {
        fn on_tick(&mut self, _ctx: &TickContext<'_>) -> Vec<OrderRequest> {
            if self.submitted {
                return Vec::new();
            }
            self.submitted = true;
            vec![
                OrderRequest::market("SPY", OrderSide::Buy, 10.0),
                OrderRequest::market("QQQ", OrderSide::Buy, 10.0),
            ]
        }
    }

    let spy = vec![
        bar("SPY", 0, 100.0, 101.0, 99.0, 100.0),
        bar("SPY", 1, 100.0, 101.0, 99.0, 100.0),
    ];
    let qqq = vec![
        bar("QQQ", 0, 100.0, 101.0, 99.0, 100.0),
        bar("QQQ", 1, 100.0, 101.0, 99.0, 100.0),
    ];

    // Enough for one 10-share fill at 100, not two.
    let config = RunConfig::new(
        1_500.0,
        vec![Instrument::us_equity("SPY"), Instrument::us_equity("QQQ")],
    );
    let mut strategy = BuyBoth { submitted: false };
    let result = run_backtest(
        &config,
        vec![
            boxed(MemoryFeed::new("SPY", spy)),
            boxed(MemoryFeed::new("QQQ", qqq)),
        ],
        Vec::new(),
        &mut strategy,
    )
    .unwrap();

    assert_eq!(result.fills.len(), 1);
    assert_eq!(result.fills[0].symbol, "SPY");

    let rejected: Vec<_> = result
        .orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Rejected { .. }))
        .collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].symbol, "QQQ");

    // Equity identity still holds on every snapshot.
    for snap in &result.snapshots {
        assert!((snap.equity - snap.derived_equity()).abs() < 1e-9);
    }
}

#[test]
fn equity_identity_holds_through_an_active_run() {
    let bars: Vec<Bar> = (0..40)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.7).sin() * 8.0;
            bar("SPY", i, close - 0.5, close + 1.5, close - 1.5, close)
        })
        .collect();

    let mut config = RunConfig::new(50_000.0, vec![Instrument::us_equity("SPY")]);
    config.execution = ExecutionConfig {
        commission: CommissionModel::PerShare { fee: 0.01 },
        ..ExecutionConfig::frictionless()
    };

    let mut strategy = tapelab_core::strategy::SmaCross::new("SPY", 3, 8, 100.0);
    let result = run_backtest(
        &config,
        vec![boxed(MemoryFeed::new("SPY", bars))],
        Vec::new(),
        &mut strategy,
    )
    .unwrap();

    assert_eq!(result.snapshots.len(), 40);
    assert!(!result.fills.is_empty(), "oscillating closes must trade");
    for snap in &result.snapshots {
        assert!(
            (snap.equity - snap.derived_equity()).abs() < 1e-6,
            "identity violated at {}: {} vs {}",
            snap.timestamp,
            snap.equity,
            snap.derived_equity()
        );
    }
}

#[test]
fn end_of_run_hook_sees_the_result() {
    struct Counting {
        inner: BuyAndHold,
        end_ticks: Option<usize>,
    }
    impl Strategy for Counting {
        fn on_tick(&mut self, ctx: &TickContext<'_>) -> Vec<OrderRequest> {
            self.inner.on_tick(ctx)
        }
        fn on_run_end(&mut self, result: &tapelab_core::engine::RunResult) {
            self.end_ticks = Some(result.tick_count);
        }
    }

    let bars = vec![
        bar("SPY", 0, 99.0, 101.0, 98.5, 100.0),
        bar("SPY", 1, 104.0, 106.0, 103.0, 105.0),
    ];
    let config = RunConfig::new(10_000.0, vec![Instrument::us_equity("SPY")]);
    let mut strategy = Counting {
        inner: BuyAndHold::new("SPY", 1.0),
        end_ticks: None,
    };
    run_backtest(
        &config,
        vec![boxed(MemoryFeed::new("SPY", bars))],
        Vec::new(),
        &mut strategy,
    )
    .unwrap();
    assert_eq!(strategy.end_ticks, Some(2));
}
