//! The backtest engine: per-day signal geometry and the RR-level grid.
//!
//! Data flow per day: opening-range extraction (15-minute bars) →
//! breakout–retest scan (5-minute bars) → trade lifecycle simulation
//! (1-minute bars). The grid driver replays the RR-independent day
//! geometry against every RR level's own active-trade state.

pub mod grid;
pub mod lifecycle;
pub mod opening_range;
pub mod scanner;

pub use grid::{
    collect_outcomes, day_geometries, run_grid, run_level, DayGeometry, GridOutcome, LevelOutcome,
};
pub use lifecycle::simulate;
pub use opening_range::extract_opening_range;
pub use scanner::scan_for_entry;
