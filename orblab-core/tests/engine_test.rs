//! End-to-end engine tests: full grid runs over a hand-built multi-day
//! three-resolution fixture.
//!
//! The fixture covers four trading days:
//! - 2024-06-03: long breakout + wick re-entry; a straight run-up resolves
//!   every RR level at its target the next minute.
//! - 2024-06-04: no 15-minute bar in [09:30, 09:45) — skipped entirely.
//! - 2024-06-05: short breakout + re-entry; the 1-minute series drifts
//!   inside even the tightest bracket and then ends, so every level is
//!   left holding an open trade.
//! - 2024-06-06: a clean long setup that must produce nothing, because
//!   every level still holds the 06-05 trade.

use chrono::{NaiveDate, NaiveDateTime};
use orblab_core::domain::{Bar, Direction};
use orblab_core::engine::{day_geometries, run_grid, run_level};
use orblab_core::rr;

fn ts(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn bar(day: u32, hour: u32, minute: u32, o: f64, h: f64, l: f64, c: f64) -> Bar {
    Bar {
        timestamp: ts(day, hour, minute),
        open: o,
        high: h,
        low: l,
        close: c,
        volume: 1000,
    }
}

fn fixture_15m() -> Vec<Bar> {
    vec![
        bar(3, 9, 30, 102.0, 105.0, 100.0, 104.0),
        bar(3, 9, 45, 104.0, 106.0, 103.5, 105.8),
        // 06-04 session starts late: no opening-range bar.
        bar(4, 9, 45, 105.0, 107.0, 104.0, 106.0),
        bar(5, 9, 30, 119.0, 120.0, 118.0, 118.5),
        bar(6, 9, 30, 129.0, 130.0, 128.0, 129.5),
    ]
}

fn fixture_5m() -> Vec<Bar> {
    vec![
        // 06-03: breakout above 105 at 09:55, wick re-entry at 10:10.
        bar(3, 9, 50, 103.0, 104.5, 102.5, 104.0),
        bar(3, 9, 55, 104.0, 106.5, 103.9, 106.0),
        bar(3, 10, 10, 106.0, 106.2, 104.0, 105.5),
        // 06-04: would be a breakout, but the day has no opening range.
        bar(4, 9, 55, 106.0, 108.5, 105.9, 108.0),
        // 06-05: breakout below 118 at 09:55, wick re-entry at 10:05.
        bar(5, 9, 55, 118.2, 118.4, 117.2, 117.5),
        bar(5, 10, 5, 117.6, 118.2, 117.4, 117.8),
        // 06-06: breakout above 130 at 09:55, wick re-entry at 10:00.
        bar(6, 9, 55, 129.6, 131.2, 129.4, 131.0),
        bar(6, 10, 0, 131.0, 131.1, 129.9, 130.5),
    ]
}

fn fixture_1m() -> Vec<Bar> {
    vec![
        // 06-03: entry bar, then a run straight through every target.
        bar(3, 10, 10, 105.5, 105.6, 105.45, 105.55),
        bar(3, 10, 11, 105.6, 110.0, 105.5, 109.9),
        // 06-05: drift inside the tightest short bracket (stop 117.918,
        // target 117.564 at rr=0.001), then the series ends.
        bar(5, 10, 5, 117.8, 117.9, 117.6, 117.7),
        bar(5, 10, 6, 117.7, 117.85, 117.62, 117.8),
    ]
}

#[test]
fn full_grid_run_over_the_fixture() {
    let outcome = run_grid(&fixture_15m(), &fixture_5m(), &fixture_1m());

    // One resolved trade per level, all from 06-03.
    assert_eq!(outcome.trades.len(), rr::LEVEL_COUNT);
    assert_eq!(outcome.trading_days, 4);
    assert_eq!(outcome.unresolved_levels, rr::LEVEL_COUNT);

    for trade in &outcome.trades {
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.entry_time, ts(3, 10, 10));
        assert_eq!(trade.entry_price, 105.5);
        assert_eq!(trade.exit_time, ts(3, 10, 11));
        let expected_target = 105.5 * (1.0 + 2.0 * trade.rr_level);
        assert!((trade.exit_price - expected_target).abs() < 1e-9);
        assert!(trade.exit_time >= trade.entry_time);
        assert!(trade.percentage_return > 0.0);
    }
}

#[test]
fn skipped_and_blocked_days_produce_no_trades() {
    let outcome = run_grid(&fixture_15m(), &fixture_5m(), &fixture_1m());

    let june_4 = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
    let june_5 = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    let june_6 = NaiveDate::from_ymd_opt(2024, 6, 6).unwrap();
    for trade in &outcome.trades {
        let entry_date = trade.entry_time.date();
        assert_ne!(entry_date, june_4, "day without opening range must be skipped");
        assert_ne!(entry_date, june_5, "unresolved entry must never appear in output");
        assert_ne!(entry_date, june_6, "blocked day must produce no trades");
    }
}

#[test]
fn geometry_is_shared_but_gating_is_per_level() {
    let days = day_geometries(&fixture_15m(), &fixture_5m());
    assert_eq!(days.len(), 4);

    // 06-05 and 06-06 both carry candidates; the 06-06 one is consumed by
    // no level because all of them are holding the 06-05 entry.
    assert!(days[2].candidate.is_some());
    assert!(days[3].candidate.is_some());
    assert_eq!(days[2].candidate.unwrap().direction, Direction::Short);
    assert_eq!(days[3].candidate.unwrap().direction, Direction::Long);

    let outcome = run_level(0.001, &days, &fixture_1m());
    assert_eq!(outcome.trades.len(), 1);
    let open = outcome.open_trade.expect("06-05 short stays open");
    assert_eq!(open.direction, Direction::Short);
    assert_eq!(open.entry_time, ts(5, 10, 5));
}

#[test]
fn ordering_is_level_ascending_then_day_ascending() {
    let outcome = run_grid(&fixture_15m(), &fixture_5m(), &fixture_1m());
    for pair in outcome.trades.windows(2) {
        assert!(
            pair[0].rr_level < pair[1].rr_level
                || (pair[0].rr_level == pair[1].rr_level
                    && pair[0].entry_time <= pair[1].entry_time)
        );
    }
}

#[test]
fn identical_inputs_produce_identical_output() {
    let first = run_grid(&fixture_15m(), &fixture_5m(), &fixture_1m());
    let second = run_grid(&fixture_15m(), &fixture_5m(), &fixture_1m());
    assert_eq!(first, second);
}
