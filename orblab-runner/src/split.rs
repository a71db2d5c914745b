//! Split a results table into one file per RR level.
//!
//! Downstream portfolio simulation consumes one per-level file at a time.
//! Grouping keys on the formatted level (three decimals) so float
//! representation noise cannot split a level across files.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use orblab_core::domain::TradeResult;

use crate::export::{format_rr_level, read_results_csv, write_results_csv};

/// Split `results_file` by RR level into `backtest_results_RR_<level>.csv`
/// files under `output_dir`. Returns the written paths in level order.
pub fn split_by_rr_level(results_file: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let trades = read_results_csv(results_file)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    // BTreeMap keyed by the formatted level: deterministic level order,
    // emission order preserved within a level.
    let mut groups: BTreeMap<String, Vec<TradeResult>> = BTreeMap::new();
    for trade in trades {
        groups
            .entry(format_rr_level(trade.rr_level))
            .or_default()
            .push(trade);
    }

    let mut written = Vec::with_capacity(groups.len());
    for (level, group) in &groups {
        let path = output_dir.join(format!("backtest_results_RR_{level}.csv"));
        write_results_csv(&path, group)?;
        written.push(path);
    }
    Ok(written)
}
