//! RR-level grid driver — orchestrates the day loop across the RR grid.
//!
//! Day geometry (opening range, breakout, re-entry) is RR-independent, so
//! it is computed once per day and replayed against each RR level's own
//! active-trade state. The active-trade skip is evaluated per level: a
//! held trade blocks every subsequent day of that level's run and is
//! never revisited (see DESIGN.md for the rationale).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ActiveTrade, Bar, CandidateEntry, OpeningRange, TradeResult};
use crate::engine::{lifecycle, opening_range, scanner};
use crate::{rr, session};

/// RR-independent signal geometry for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayGeometry {
    pub date: NaiveDate,
    /// Breakout reference band; `None` when no 15-minute bar opened the
    /// session, which skips the day for every RR level.
    pub range: Option<OpeningRange>,
    /// Confirmed wick re-entry, at most one per day.
    pub candidate: Option<CandidateEntry>,
}

/// Result of one RR level's run over the day sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelOutcome {
    pub rr_level: f64,
    /// Resolved trades in day-ascending emission order.
    pub trades: Vec<TradeResult>,
    /// Trade still open when the run ended, if any. Never emitted as a
    /// result; it blocked every day after its entry.
    pub open_trade: Option<ActiveTrade>,
}

/// Result of the full grid run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOutcome {
    /// All resolved trades: RR level ascending, day ascending within a level.
    pub trades: Vec<TradeResult>,
    /// Number of RR levels that ended with a trade still open.
    pub unresolved_levels: usize,
    /// Number of distinct trading days in the 15-minute series.
    pub trading_days: usize,
}

/// Compute the per-day geometry for every distinct date in the 15-minute
/// series, in ascending date order.
pub fn day_geometries(bars_15m: &[Bar], bars_5m: &[Bar]) -> Vec<DayGeometry> {
    session::trading_days(bars_15m)
        .into_iter()
        .map(|date| {
            let day_15m = session::day_slice(bars_15m, date);
            let range = opening_range::extract_opening_range(day_15m);
            let candidate = range.as_ref().and_then(|range| {
                let day_5m = session::day_slice(bars_5m, date);
                scanner::scan_for_entry(
                    session::in_window(day_5m, session::scan_start(), session::scan_end()),
                    range,
                )
            });
            DayGeometry {
                date,
                range,
                candidate,
            }
        })
        .collect()
}

/// Run a single RR level over the precomputed day sequence.
///
/// Owns the level's active-trade state: a held trade skips the day before
/// any geometry is consulted.
pub fn run_level(rr_level: f64, days: &[DayGeometry], bars_1m: &[Bar]) -> LevelOutcome {
    let mut trades = Vec::new();
    let mut active: Option<ActiveTrade> = None;

    for day in days {
        if active.is_some() {
            continue;
        }
        let Some(candidate) = day.candidate else {
            continue;
        };

        let (stop_loss, target) = rr::brackets(candidate.direction, candidate.entry_price, rr_level);
        let trade = ActiveTrade {
            direction: candidate.direction,
            entry_price: candidate.entry_price,
            entry_time: candidate.entry_time,
            stop_loss,
            target,
        };

        match lifecycle::simulate(rr_level, &trade, bars_1m) {
            Some(result) => trades.push(result),
            None => active = Some(trade),
        }
    }

    LevelOutcome {
        rr_level,
        trades,
        open_trade: active,
    }
}

/// Run the full RR grid sequentially: every level over every trading day.
///
/// The runner crate parallelizes across levels instead; both produce the
/// same rows in the same order (level outcomes concatenate in grid order).
pub fn run_grid(bars_15m: &[Bar], bars_5m: &[Bar], bars_1m: &[Bar]) -> GridOutcome {
    let days = day_geometries(bars_15m, bars_5m);
    let outcomes: Vec<LevelOutcome> = rr::levels()
        .into_iter()
        .map(|rr_level| run_level(rr_level, &days, bars_1m))
        .collect();
    collect_outcomes(outcomes, days.len())
}

/// Flatten per-level outcomes (already in grid order) into a GridOutcome.
pub fn collect_outcomes(outcomes: Vec<LevelOutcome>, trading_days: usize) -> GridOutcome {
    let unresolved_levels = outcomes.iter().filter(|o| o.open_trade.is_some()).count();
    let trades = outcomes.into_iter().flat_map(|o| o.trades).collect();
    GridOutcome {
        trades,
        unresolved_levels,
        trading_days,
    }
}
