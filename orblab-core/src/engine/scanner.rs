//! Breakout–retest scanner — the per-day entry state machine.
//!
//! Runs over the day's 5-minute bars restricted to [09:50, 11:30).
//! Two states: seek the first close beyond the opening range (which fixes
//! the direction for the rest of the day), then seek the first bar whose
//! wick retraces to the range edge while its close holds beyond it.

use crate::domain::{Bar, CandidateEntry, Direction, OpeningRange};

/// Scanner state. The first breakout is final for the day — once a
/// direction is fixed, the opposite side is never evaluated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingBreakout,
    SeekingReentry(Direction),
}

/// Scan the day's (already windowed, chronological) 5-minute bars for a
/// wick re-entry after a breakout. At most one candidate per day.
pub fn scan_for_entry<'a>(
    bars: impl Iterator<Item = &'a Bar>,
    range: &OpeningRange,
) -> Option<CandidateEntry> {
    let mut state = ScanState::SeekingBreakout;

    for bar in bars {
        match state {
            ScanState::SeekingBreakout => {
                if bar.close > range.high {
                    state = ScanState::SeekingReentry(Direction::Long);
                } else if bar.close < range.low {
                    state = ScanState::SeekingReentry(Direction::Short);
                }
            }
            ScanState::SeekingReentry(direction) => {
                let reentered = match direction {
                    Direction::Long => bar.low <= range.high && bar.close > range.high,
                    Direction::Short => bar.high >= range.low && bar.close < range.low,
                };
                if reentered {
                    return Some(CandidateEntry {
                        direction,
                        entry_price: bar.close,
                        entry_time: bar.timestamp,
                    });
                }
            }
        }
    }

    None
}
