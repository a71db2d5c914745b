//! Opening-range extraction from the day's 15-minute bars.

use crate::domain::{Bar, OpeningRange};
use crate::session;

/// Derive the day's breakout reference band from the single 15-minute bar
/// whose timestamp lies in [09:30, 09:45).
///
/// Returns `None` when no bar falls in the window (holiday, gap, missing
/// session); the caller skips the day entirely in that case.
pub fn extract_opening_range(day_15m: &[Bar]) -> Option<OpeningRange> {
    let bar = session::in_window(
        day_15m,
        session::opening_range_start(),
        session::opening_range_end(),
    )
    .next()?;

    Some(OpeningRange {
        date: bar.date(),
        high: bar.high,
        low: bar.low,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(hour: u32, minute: u32, high: f64, low: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1000,
        }
    }

    #[test]
    fn extracts_the_session_open_bar() {
        let day = vec![bar(9, 30, 105.0, 100.0), bar(9, 45, 107.0, 104.0)];
        let range = extract_opening_range(&day).unwrap();
        assert_eq!(range.high, 105.0);
        assert_eq!(range.low, 100.0);
        assert_eq!(range.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn bar_at_0945_is_outside_the_window() {
        let day = vec![bar(9, 45, 107.0, 104.0), bar(10, 0, 108.0, 105.0)];
        assert!(extract_opening_range(&day).is_none());
    }

    #[test]
    fn empty_day_yields_no_range() {
        assert!(extract_opening_range(&[]).is_none());
    }
}
