//! Domain types for the opening-range breakout simulator.

mod bar;
mod range;
mod trade;

pub use bar::Bar;
pub use range::OpeningRange;
pub use trade::{ActiveTrade, CandidateEntry, Direction, TradeResult};
