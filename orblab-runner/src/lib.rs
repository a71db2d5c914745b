//! ORB Lab Runner — orchestration around the core engine.
//!
//! Owns everything the engine itself does not: CSV loading and validation
//! of the three bar series, TOML configuration, parallel execution of the
//! RR grid, result export, the per-level splitter, and the portfolio
//! equity simulator.

pub mod config;
pub mod data_loader;
pub mod export;
pub mod portfolio;
pub mod runner;
pub mod split;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{load_market_data, LoadError, MarketData};
pub use runner::{run_backtest, BacktestResult, RunError};
