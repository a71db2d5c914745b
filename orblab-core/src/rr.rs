//! The fixed risk-reward grid and stop/target derivation.
//!
//! Twenty RR levels from 0.1% to 2.0% in 0.1% steps. The RR level is the
//! fractional stop distance from entry; the target sits at twice that
//! distance in the favorable direction, a fixed 1:2 risk:reward at every
//! level.

use crate::domain::Direction;

/// Number of RR levels in the grid.
pub const LEVEL_COUNT: usize = 20;

/// Step between adjacent RR levels.
pub const LEVEL_STEP: f64 = 0.001;

/// The full RR grid in ascending order: 0.001, 0.002, ..., 0.020.
pub fn levels() -> Vec<f64> {
    (1..=LEVEL_COUNT).map(|i| i as f64 * LEVEL_STEP).collect()
}

/// Stop-loss and target prices for an entry at `entry_price` with RR `rr`.
///
/// long:  stop = p·(1−r), target = p·(1+2r)
/// short: stop = p·(1+r), target = p·(1−2r)
pub fn brackets(direction: Direction, entry_price: f64, rr: f64) -> (f64, f64) {
    match direction {
        Direction::Long => (entry_price * (1.0 - rr), entry_price * (1.0 + 2.0 * rr)),
        Direction::Short => (entry_price * (1.0 + rr), entry_price * (1.0 - 2.0 * rr)),
    }
}
