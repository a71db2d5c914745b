//! Trade lifecycle simulation against the 1-minute series.
//!
//! Walks 1-minute bars with timestamp >= entry_time — not bounded to the
//! entry day — until stop or target is breached or the series runs out.
//! The stop is checked before the target on every bar, so a bar that
//! breaches both resolves as a stop-loss exit. Exits fill at the stop or
//! target level itself, not at the bar extreme.

use crate::domain::{ActiveTrade, Bar, Direction, TradeResult};

/// Simulate an active trade to resolution.
///
/// Returns `None` when the 1-minute series is exhausted with neither
/// bracket breached; the trade then stays active in the caller's
/// per-level state. The adverse extreme (min low for long, max high for
/// short) runs from the first walked bar through the exit bar inclusive
/// and is updated before the exit check on each bar.
pub fn simulate(rr: f64, trade: &ActiveTrade, bars_1m: &[Bar]) -> Option<TradeResult> {
    let start = bars_1m.partition_point(|b| b.timestamp < trade.entry_time);
    let mut adverse_extreme: Option<f64> = None;

    for bar in &bars_1m[start..] {
        match trade.direction {
            Direction::Long => {
                adverse_extreme = Some(match adverse_extreme {
                    Some(extreme) => extreme.min(bar.low),
                    None => bar.low,
                });
                if bar.low <= trade.stop_loss {
                    return Some(resolve(rr, trade, bar, trade.stop_loss, adverse_extreme));
                }
                if bar.high >= trade.target {
                    return Some(resolve(rr, trade, bar, trade.target, adverse_extreme));
                }
            }
            Direction::Short => {
                adverse_extreme = Some(match adverse_extreme {
                    Some(extreme) => extreme.max(bar.high),
                    None => bar.high,
                });
                if bar.high >= trade.stop_loss {
                    return Some(resolve(rr, trade, bar, trade.stop_loss, adverse_extreme));
                }
                if bar.low <= trade.target {
                    return Some(resolve(rr, trade, bar, trade.target, adverse_extreme));
                }
            }
        }
    }

    None
}

fn resolve(
    rr: f64,
    trade: &ActiveTrade,
    exit_bar: &Bar,
    exit_price: f64,
    adverse_extreme: Option<f64>,
) -> TradeResult {
    let entry = trade.entry_price;
    // The extreme is always set by the time an exit fires: it is updated
    // on the exit bar before the bracket check.
    let extreme = adverse_extreme.unwrap_or(entry);

    let (percentage_return, max_drawdown_pct) = match trade.direction {
        Direction::Long => (
            (exit_price - entry) / entry * 100.0,
            (extreme - entry) / entry * 100.0,
        ),
        Direction::Short => (
            (entry - exit_price) / entry * 100.0,
            (entry - extreme) / entry * 100.0,
        ),
    };

    TradeResult {
        rr_level: rr,
        direction: trade.direction,
        entry_time: trade.entry_time,
        entry_price: entry,
        exit_time: exit_bar.timestamp,
        exit_price,
        max_drawdown_pct,
        percentage_return,
    }
}
