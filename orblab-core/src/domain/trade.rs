//! Trade lifecycle types: candidate entry → active trade → trade result.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction, fixed at breakout time for the rest of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("long"),
            Direction::Short => f.write_str("short"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Output of the breakout–retest scanner: a confirmed wick re-entry.
///
/// At most one candidate per day. RR-independent — the same candidate is
/// replayed against every RR level's active-trade gating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
}

/// An entered but unresolved position.
///
/// Persists across day iterations within one RR-level run until stop or
/// target is breached or the 1-minute series runs out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveTrade {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub stop_loss: f64,
    pub target: f64,
}

/// A resolved trade: emitted only when stop or target was hit before the
/// 1-minute data ran out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub rr_level: f64,
    pub direction: Direction,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    /// Adverse excursion from entry through exit, as a percent of entry.
    /// Running min-low for long, max-high for short, entry bar inclusive.
    pub max_drawdown_pct: f64,
    pub percentage_return: f64,
}

impl TradeResult {
    pub fn is_winner(&self) -> bool {
        self.percentage_return > 0.0
    }
}
