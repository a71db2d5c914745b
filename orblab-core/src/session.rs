//! Session calendar — intraday windows and day grouping over sorted series.
//!
//! All windows are half-open [start, end). The opening-range window is the
//! first 15 minutes of the regular session; the scan window is where the
//! breakout–retest machine looks for an entry.

use crate::domain::Bar;
use chrono::{NaiveDate, NaiveTime};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid session time")
}

/// Start of the opening-range window (session open), 09:30.
pub fn opening_range_start() -> NaiveTime {
    hm(9, 30)
}

/// End of the opening-range window (exclusive), 09:45.
pub fn opening_range_end() -> NaiveTime {
    hm(9, 45)
}

/// Start of the breakout scan window, 09:50.
pub fn scan_start() -> NaiveTime {
    hm(9, 50)
}

/// End of the breakout scan window (exclusive), 11:30.
pub fn scan_end() -> NaiveTime {
    hm(11, 30)
}

/// The contiguous slice of `bars` falling on `date`.
///
/// Requires `bars` sorted by timestamp (the loader validates this).
pub fn day_slice(bars: &[Bar], date: NaiveDate) -> &[Bar] {
    let start = bars.partition_point(|b| b.date() < date);
    let end = bars.partition_point(|b| b.date() <= date);
    &bars[start..end]
}

/// Bars from a day slice whose time lies in the half-open window [start, end).
pub fn in_window<'a>(
    bars: &'a [Bar],
    start: NaiveTime,
    end: NaiveTime,
) -> impl Iterator<Item = &'a Bar> {
    bars.iter()
        .filter(move |b| b.time() >= start && b.time() < end)
}

/// Distinct dates present in a sorted series, ascending.
pub fn trading_days(bars: &[Bar]) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    for bar in bars {
        if days.last() != Some(&bar.date()) {
            days.push(bar.date());
        }
    }
    days
}
