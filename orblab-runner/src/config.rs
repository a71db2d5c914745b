//! Serializable backtest configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration for a single backtest run.
///
/// Captures everything needed to reproduce the run: the three input
/// series, the inception date all series are filtered to, and where the
/// results table goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub data: DataConfig,
    pub backtest: BacktestSection,
}

/// Input series locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Headered CSV of 15-minute bars (Datetime,Open,High,Low,Close,Volume).
    pub file_15min: PathBuf,
    /// Headered CSV of 5-minute bars, same columns.
    pub file_5min: PathBuf,
    /// Headerless CSV of 1-minute bars, same column order.
    pub file_1min: PathBuf,
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    /// All three series are filtered to timestamps on or after this date.
    pub inception: NaiveDate,
    /// Results CSV destination, written once after the grid completes.
    pub output: PathBuf,
}

impl BacktestConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
