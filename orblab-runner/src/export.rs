//! Results table export — the downstream column contract.
//!
//! One CSV, written once after the full grid completes. The column names
//! and order are consumed by the splitter and the portfolio simulator and
//! must stay exactly:
//! `RR_Level,Direction,Entry_Time,Entry_Price,Exit_Time,Exit_Price,Max_Drawdown,Percentage_Return`

use anyhow::{bail, Context, Result};
use std::path::Path;

use orblab_core::domain::{Direction, TradeResult};

use crate::data_loader::parse_timestamp;
use crate::runner::{BacktestResult, SCHEMA_VERSION};

/// Header row of the results table.
pub const RESULT_COLUMNS: [&str; 8] = [
    "RR_Level",
    "Direction",
    "Entry_Time",
    "Entry_Price",
    "Exit_Time",
    "Exit_Price",
    "Max_Drawdown",
    "Percentage_Return",
];

/// Format an RR level the way the output table and split filenames do.
pub fn format_rr_level(rr_level: f64) -> String {
    format!("{rr_level:.3}")
}

/// Write the results table. Rows are emitted in the order given, which
/// for a grid run is RR level ascending, day ascending within a level.
pub fn write_results_csv(path: &Path, trades: &[TradeResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create results CSV {}", path.display()))?;

    writer.write_record(RESULT_COLUMNS)?;
    for trade in trades {
        writer.write_record([
            format_rr_level(trade.rr_level),
            trade.direction.to_string(),
            trade.entry_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.6}", trade.entry_price),
            trade.exit_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.6}", trade.exit_price),
            format!("{:.6}", trade.max_drawdown_pct),
            format!("{:.6}", trade.percentage_return),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush results CSV {}", path.display()))
}

/// Serialize a full run summary to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a run summary from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Read a results table back (used by the splitter and portfolio sim).
pub fn read_results_csv(path: &Path) -> Result<Vec<TradeResult>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open results CSV {}", path.display()))?;

    let mut trades = Vec::new();
    for (record, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("bad record {record} in {}", path.display()))?;
        if row.len() != RESULT_COLUMNS.len() {
            bail!(
                "{}: record {record}: expected {} fields, found {}",
                path.display(),
                RESULT_COLUMNS.len(),
                row.len()
            );
        }

        let time = |value: &str| {
            parse_timestamp(value)
                .with_context(|| format!("{}: record {record}: bad timestamp '{value}'", path.display()))
        };
        let number = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{}: record {record}: bad number '{value}'", path.display()))
        };

        let direction: Direction = row[1]
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: record {record}: {e}", path.display()))?;

        trades.push(TradeResult {
            rr_level: number(&row[0])?,
            direction,
            entry_time: time(&row[2])?,
            entry_price: number(&row[3])?,
            exit_time: time(&row[4])?,
            exit_price: number(&row[5])?,
            max_drawdown_pct: number(&row[6])?,
            percentage_return: number(&row[7])?,
        });
    }
    Ok(trades)
}
