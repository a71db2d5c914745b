//! Bar — the fundamental market data unit.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// OHLCV bar at a fixed intraday resolution (1, 5, or 15 minutes).
///
/// The upstream resampler contract guarantees volume > 0 and no missing
/// fields; each series is sorted by timestamp with no duplicates. The
/// engine treats every loaded series as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Calendar date of this bar.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Intraday time of this bar.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Basic OHLC sanity check: high bounds the other prices, low bounds
    /// them from below, prices positive, volume nonzero.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume > 0
    }
}
