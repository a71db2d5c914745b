//! Backtest runner — wires together loading, the RR grid, and export.
//!
//! The grid is embarrassingly parallel: each RR level owns its own
//! active-trade state and the day geometry is RR-independent, so levels
//! run on rayon workers. `collect` preserves grid order, which keeps the
//! output rows byte-identical to a sequential run (level ascending, day
//! ascending within a level).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orblab_core::domain::TradeResult;
use orblab_core::engine::{collect_outcomes, day_geometries, run_level, GridOutcome, LevelOutcome};
use orblab_core::rr;

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_market_data, LoadError, MarketData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted run summaries.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Resolved trades: RR level ascending, day ascending within a level.
    pub trades: Vec<TradeResult>,
    /// BLAKE3 hash of the three filtered input series.
    pub dataset_hash: String,
    /// Distinct trading days in the 15-minute series.
    pub trading_days: usize,
    /// RR levels whose run ended holding an unresolved trade. Those
    /// trades never reach the output; see DESIGN.md.
    pub unresolved_levels: usize,
    pub bar_count_15m: usize,
    pub bar_count_5m: usize,
    pub bar_count_1m: usize,
}

/// Default schema version for deserializing older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Load the configured series and run the full RR grid.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    let data = load_market_data(
        &config.data.file_15min,
        &config.data.file_5min,
        &config.data.file_1min,
        config.backtest.inception,
    )?;
    Ok(run_from_data(&data))
}

/// Run the RR grid over already-loaded market data.
pub fn run_from_data(data: &MarketData) -> BacktestResult {
    let outcome = run_grid_parallel(data);
    BacktestResult {
        schema_version: SCHEMA_VERSION,
        trades: outcome.trades,
        dataset_hash: data.dataset_hash.clone(),
        trading_days: outcome.trading_days,
        unresolved_levels: outcome.unresolved_levels,
        bar_count_15m: data.bars_15m.len(),
        bar_count_5m: data.bars_5m.len(),
        bar_count_1m: data.bars_1m.len(),
    }
}

/// Drive the RR grid across rayon workers.
///
/// Day geometry is computed once and shared read-only; each level run is
/// independent. Collecting a `par_iter` map keeps grid order.
pub fn run_grid_parallel(data: &MarketData) -> GridOutcome {
    let days = day_geometries(&data.bars_15m, &data.bars_5m);
    let outcomes: Vec<LevelOutcome> = rr::levels()
        .into_par_iter()
        .map(|rr_level| run_level(rr_level, &days, &data.bars_1m))
        .collect();
    collect_outcomes(outcomes, days.len())
}
