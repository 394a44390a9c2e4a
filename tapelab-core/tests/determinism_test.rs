//! Reproducibility — identical inputs must yield bit-identical results.

use chrono::{DateTime, TimeZone, Utc};
use tapelab_core::domain::{CorporateAction, Instrument};
use tapelab_core::engine::{run_backtest, RunConfig, RunResult};
use tapelab_core::feed::{DataFeed, GbmFeed};
use tapelab_core::strategy::SmaCross;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap()
}

fn run_once(seed: u64) -> RunResult {
    let config = RunConfig::new(
        1_000_000.0,
        vec![Instrument::us_equity("AAA"), Instrument::us_equity("BBB")],
    );
    let feeds: Vec<Box<dyn DataFeed>> = vec![
        Box::new(GbmFeed::new("AAA", start(), 300, 100.0, 0.02, 0.0003, seed)),
        Box::new(GbmFeed::new("BBB", start(), 300, 50.0, 0.03, 0.0, seed + 1)),
    ];
    let actions = vec![
        CorporateAction::dividend("AAA", start() + chrono::Duration::days(100), 0.5),
        CorporateAction::split("BBB", start() + chrono::Duration::days(150), 2.0),
    ];
    let mut strategy = SmaCross::new("AAA", 5, 20, 100.0);
    run_backtest(&config, feeds, actions, &mut strategy).unwrap()
}

#[test]
fn identical_runs_are_bit_identical() {
    let a = run_once(99);
    let b = run_once(99);

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.snapshots.len(), b.snapshots.len());

    // Bit-identical snapshot sequences, not merely tolerably close.
    let json_a = serde_json::to_string(&a.snapshots).unwrap();
    let json_b = serde_json::to_string(&b.snapshots).unwrap();
    assert_eq!(json_a, json_b);

    // The rest of the result is equally reproducible.
    assert_eq!(a.fills, b.fills);
    assert_eq!(a.trades, b.trades);
    assert_eq!(a.orders, b.orders);
    assert_eq!(a.diagnostics, b.diagnostics);
}

#[test]
fn different_inputs_change_the_fingerprint() {
    let a = run_once(99);
    let b = run_once(7);
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn dispatch_order_is_stable_across_runs() {
    let a = run_once(42);
    let b = run_once(42);

    let times_a: Vec<_> = a.snapshots.iter().map(|s| s.timestamp).collect();
    let times_b: Vec<_> = b.snapshots.iter().map(|s| s.timestamp).collect();
    assert_eq!(times_a, times_b);

    // Non-decreasing (strictly increasing: one snapshot per tick).
    for pair in times_a.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}
