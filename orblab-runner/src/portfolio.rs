//! Portfolio equity simulation over one RR level's trade file.
//!
//! Consumes trades sequentially, applying each Percentage_Return to a
//! compounding balance. Trades that begin before the previously applied
//! trade has exited are skipped — the account holds one position at a
//! time. Produces summary statistics and the equity-curve points.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use orblab_core::domain::TradeResult;

use crate::export::read_results_csv;

/// Summary statistics for one simulated portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate_pct: f64,
    pub loss_rate_pct: f64,
}

/// One point of the equity curve: balance after a trade was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub time: NaiveDateTime,
    pub balance: f64,
}

/// Simulate a compounding account over a sequential trade list.
///
/// With a `start` date, trades entered before it are ignored entirely:
/// they neither move the balance nor hold the one-position slot.
pub fn simulate(
    trades: &[TradeResult],
    initial_balance: f64,
    start: Option<NaiveDate>,
) -> (PortfolioStats, Vec<EquityPoint>) {
    let mut balance = initial_balance;
    let mut peak_balance = initial_balance;
    let mut max_drawdown = 0.0_f64;
    let mut wins = 0;
    let mut losses = 0;
    let mut curve = Vec::new();
    let mut last_exit: Option<NaiveDateTime> = None;

    for trade in trades {
        if let Some(start) = start {
            if trade.entry_time.date() < start {
                continue;
            }
        }
        // One position at a time: skip overlapping entries.
        if let Some(exit) = last_exit {
            if trade.entry_time <= exit {
                continue;
            }
        }

        let trade_return = trade.percentage_return / 100.0 * balance;
        balance += trade_return;
        curve.push(EquityPoint {
            time: trade.entry_time,
            balance,
        });

        if trade_return > 0.0 {
            wins += 1;
        } else {
            losses += 1;
        }

        if balance > peak_balance {
            peak_balance = balance;
        }
        let drawdown = (peak_balance - balance) / peak_balance;
        max_drawdown = max_drawdown.max(drawdown);

        last_exit = Some(trade.exit_time);
    }

    let total_trades = wins + losses;
    let rate = |count: usize| {
        if total_trades > 0 {
            count as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        }
    };

    let stats = PortfolioStats {
        initial_balance,
        final_balance: balance,
        total_return_pct: (balance - initial_balance) / initial_balance * 100.0,
        max_drawdown_pct: max_drawdown * 100.0,
        total_trades,
        wins,
        losses,
        win_rate_pct: rate(wins),
        loss_rate_pct: rate(losses),
    };
    (stats, curve)
}

/// Write an equity curve as CSV (Entry_Time,Balance).
pub fn write_equity_csv(path: &Path, curve: &[EquityPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writer.write_record(["Entry_Time", "Balance"])?;
    for point in curve {
        writer.write_record([
            point.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", point.balance),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush equity CSV {}", path.display()))
}

/// Simulate every per-level file in `input_dir`.
///
/// Writes one equity curve per level into `equity_dir` and a combined
/// stats table to `output_csv`. Files are processed in name order so the
/// combined table is deterministic.
pub fn simulate_directory(
    input_dir: &Path,
    output_csv: &Path,
    equity_dir: &Path,
    initial_balance: f64,
    start: Option<NaiveDate>,
) -> Result<Vec<(String, PortfolioStats)>> {
    std::fs::create_dir_all(equity_dir)
        .with_context(|| format!("failed to create equity dir {}", equity_dir.display()))?;

    let mut level_files: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read input dir {}", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    level_files.sort();

    let mut all_stats = Vec::with_capacity(level_files.len());
    for file in &level_files {
        let level = level_from_filename(file);
        let trades = read_results_csv(file)?;
        let (stats, curve) = simulate(&trades, initial_balance, start);
        write_equity_csv(&equity_dir.join(format!("equity_curve_RR_{level}.csv")), &curve)?;
        all_stats.push((level, stats));
    }

    write_stats_csv(output_csv, &all_stats)?;
    Ok(all_stats)
}

/// RR level embedded in a per-level filename: the part after the last '_'.
fn level_from_filename(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit('_').next())
        .unwrap_or("unknown")
        .to_string()
}

fn write_stats_csv(path: &Path, all_stats: &[(String, PortfolioStats)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create stats CSV {}", path.display()))?;
    writer.write_record([
        "RR_Level",
        "Initial_Balance",
        "Final_Balance",
        "Total_Return_Pct",
        "Max_Drawdown_Pct",
        "Total_Trades",
        "Wins",
        "Losses",
        "Win_Rate_Pct",
        "Loss_Rate_Pct",
    ])?;
    for (level, stats) in all_stats {
        writer.write_record([
            level.clone(),
            format!("{:.2}", stats.initial_balance),
            format!("{:.2}", stats.final_balance),
            format!("{:.6}", stats.total_return_pct),
            format!("{:.6}", stats.max_drawdown_pct),
            stats.total_trades.to_string(),
            stats.wins.to_string(),
            stats.losses.to_string(),
            format!("{:.6}", stats.win_rate_pct),
            format!("{:.6}", stats.loss_rate_pct),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush stats CSV {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use orblab_core::domain::Direction;

    fn trade(entry_minute: u32, exit_minute: u32, percentage_return: f64) -> TradeResult {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        TradeResult {
            rr_level: 0.01,
            direction: Direction::Long,
            entry_time: day.and_hms_opt(10, entry_minute, 0).unwrap(),
            entry_price: 100.0,
            exit_time: day.and_hms_opt(10, exit_minute, 0).unwrap(),
            exit_price: 100.0 + percentage_return,
            max_drawdown_pct: -0.5,
            percentage_return,
        }
    }

    #[test]
    fn returns_compound_on_the_balance() {
        let trades = vec![trade(0, 5, 2.0), trade(10, 15, -1.0)];
        let (stats, curve) = simulate(&trades, 100_000.0, None);
        assert!((curve[0].balance - 102_000.0).abs() < 1e-6);
        assert!((stats.final_balance - 102_000.0 * 0.99).abs() < 1e-6);
        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert!((stats.win_rate_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_trades_are_skipped() {
        // Second trade enters before (and third exactly at) the first exit.
        let trades = vec![trade(0, 30, 2.0), trade(10, 40, 5.0), trade(30, 50, 5.0)];
        let (stats, curve) = simulate(&trades, 100_000.0, None);
        assert_eq!(stats.total_trades, 1);
        assert_eq!(curve.len(), 1);
        assert!((stats.final_balance - 102_000.0).abs() < 1e-6);
    }

    #[test]
    fn drawdown_measures_from_the_peak() {
        let trades = vec![trade(0, 5, 10.0), trade(10, 15, -20.0), trade(20, 25, 5.0)];
        let (stats, _) = simulate(&trades, 100_000.0, None);
        assert!((stats.max_drawdown_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_trade_list_yields_flat_stats() {
        let (stats, curve) = simulate(&[], 100_000.0, None);
        assert!(curve.is_empty());
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.final_balance, 100_000.0);
        assert_eq!(stats.win_rate_pct, 0.0);
    }

    #[test]
    fn trades_before_the_start_date_are_ignored() {
        let mut late = trade(0, 5, 5.0);
        late.entry_time += chrono::Duration::days(2);
        late.exit_time += chrono::Duration::days(2);
        let trades = vec![trade(0, 5, 2.0), trade(10, 15, 2.0), late];

        let start = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let (stats, curve) = simulate(&trades, 100_000.0, Some(start));
        assert_eq!(stats.total_trades, 1);
        assert_eq!(curve.len(), 1);
        assert!((stats.final_balance - 105_000.0).abs() < 1e-6);
    }

    #[test]
    fn level_is_extracted_from_the_filename() {
        let path = Path::new("out/backtest_results_RR_0.005.csv");
        assert_eq!(level_from_filename(path), "0.005");
    }
}
