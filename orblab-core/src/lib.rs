//! ORB Lab Core — engine, domain types, session calendar, RR grid.
//!
//! This crate contains the heart of the opening-range breakout simulator:
//! - Domain types (bars, opening ranges, candidate entries, active trades, trade results)
//! - Session calendar helpers (day grouping, intraday time windows)
//! - Opening-range extractor over the 15-minute series
//! - Breakout–retest scanner over the 5-minute series
//! - Trade lifecycle simulator over the 1-minute series
//! - RR-level grid driver with per-level active-trade state
//! - OHLC resampler (1-minute → N-minute aggregation)
//!
//! The crate performs no I/O. All three bar series arrive fully loaded and
//! sorted; the runner crate owns loading, validation, and export.

pub mod domain;
pub mod engine;
pub mod resample;
pub mod rr;
pub mod session;
