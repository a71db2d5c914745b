//! OpeningRange — the day's breakout reference band.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// High/low of the single 15-minute bar opening the session.
///
/// Derived once per calendar day from the bar whose timestamp falls in
/// [09:30, 09:45). Days without such a bar produce no range and are
/// skipped entirely, for every RR level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningRange {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
}

impl OpeningRange {
    /// Width of the band in price units.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}
