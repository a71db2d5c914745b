//! ORB Lab CLI — resample, backtest, split, and portfolio commands.
//!
//! Commands:
//! - `resample` — aggregate a headerless 1-minute CSV into headered
//!   5-minute and 15-minute CSVs
//! - `backtest` — run the opening-range breakout grid and write the
//!   results table
//! - `split` — split a results table into one file per RR level
//! - `portfolio` — simulate a compounding account over each per-level
//!   file and export equity curves plus combined stats

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orblab_core::resample::resample;
use orblab_runner::config::{BacktestConfig, BacktestSection, DataConfig};
use orblab_runner::data_loader::{read_sorted_bars_csv, write_bars_csv};
use orblab_runner::export::write_results_csv;
use orblab_runner::portfolio::simulate_directory;
use orblab_runner::run_backtest;
use orblab_runner::split::split_by_rr_level;

#[derive(Parser)]
#[command(
    name = "orblab",
    about = "ORB Lab — multi-timeframe opening-range breakout backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate 1-minute bars into 5-minute and 15-minute CSVs.
    Resample {
        /// Headerless 1-minute CSV (Datetime,Open,High,Low,Close,Volume).
        #[arg(long)]
        input_1min: PathBuf,

        /// Directory for bars_5min.csv and bars_15min.csv.
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Run the RR-grid backtest and write the results table.
    Backtest {
        /// Path to a TOML config file. Overrides the individual flags.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Headered 15-minute CSV.
        #[arg(long)]
        file_15min: Option<PathBuf>,

        /// Headered 5-minute CSV.
        #[arg(long)]
        file_5min: Option<PathBuf>,

        /// Headerless 1-minute CSV.
        #[arg(long)]
        file_1min: Option<PathBuf>,

        /// Inception date (YYYY-MM-DD); all series are filtered to it.
        #[arg(long, default_value = "2024-06-01")]
        inception: String,

        /// Results CSV destination.
        #[arg(long, default_value = "backtest_results.csv")]
        output: PathBuf,
    },
    /// Split a results table into one file per RR level.
    Split {
        /// Results CSV produced by `backtest`.
        #[arg(long)]
        results: PathBuf,

        /// Directory for the per-level files.
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Simulate a compounding account over each per-level file.
    Portfolio {
        /// Directory of per-level files produced by `split`.
        #[arg(long)]
        input_dir: PathBuf,

        /// Combined stats CSV destination.
        #[arg(long)]
        output: PathBuf,

        /// Directory for per-level equity-curve CSVs.
        #[arg(long)]
        equity_dir: PathBuf,

        /// Starting account balance.
        #[arg(long, default_value_t = 100_000.0)]
        initial_balance: f64,

        /// Only apply trades entered on or after this date (YYYY-MM-DD).
        #[arg(long)]
        start_date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Resample {
            input_1min,
            output_dir,
        } => cmd_resample(&input_1min, &output_dir),
        Commands::Backtest {
            config,
            file_15min,
            file_5min,
            file_1min,
            inception,
            output,
        } => cmd_backtest(config, file_15min, file_5min, file_1min, &inception, output),
        Commands::Split {
            results,
            output_dir,
        } => cmd_split(&results, &output_dir),
        Commands::Portfolio {
            input_dir,
            output,
            equity_dir,
            initial_balance,
            start_date,
        } => cmd_portfolio(
            &input_dir,
            &output,
            &equity_dir,
            initial_balance,
            start_date.as_deref(),
        ),
    }
}

fn cmd_resample(input_1min: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    let bars_1m = read_sorted_bars_csv(input_1min, false)?;
    println!("Loaded {} one-minute bars.", bars_1m.len());

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let bars_5m = resample(&bars_1m, 5);
    let bars_15m = resample(&bars_1m, 15);
    let file_5m = output_dir.join("bars_5min.csv");
    let file_15m = output_dir.join("bars_15min.csv");
    write_bars_csv(&file_5m, &bars_5m)?;
    write_bars_csv(&file_15m, &bars_15m)?;

    println!("Wrote {} five-minute bars to {}.", bars_5m.len(), file_5m.display());
    println!("Wrote {} fifteen-minute bars to {}.", bars_15m.len(), file_15m.display());
    Ok(())
}

fn cmd_backtest(
    config: Option<PathBuf>,
    file_15min: Option<PathBuf>,
    file_5min: Option<PathBuf>,
    file_1min: Option<PathBuf>,
    inception: &str,
    output: PathBuf,
) -> Result<()> {
    let config = match config {
        Some(path) => BacktestConfig::load(&path)?,
        None => {
            let (Some(file_15min), Some(file_5min), Some(file_1min)) =
                (file_15min, file_5min, file_1min)
            else {
                bail!("either --config or all of --file-15min/--file-5min/--file-1min are required");
            };
            let inception = NaiveDate::parse_from_str(inception, "%Y-%m-%d")
                .with_context(|| format!("bad inception date '{inception}'"))?;
            BacktestConfig {
                data: DataConfig {
                    file_15min,
                    file_5min,
                    file_1min,
                },
                backtest: BacktestSection { inception, output },
            }
        }
    };

    println!("Loading datasets...");
    let result = run_backtest(&config)?;
    println!(
        "Grid complete: {} trades over {} trading days ({} levels ended with an open trade).",
        result.trades.len(),
        result.trading_days,
        result.unresolved_levels
    );
    println!("Dataset hash: {}", result.dataset_hash);

    write_results_csv(&config.backtest.output, &result.trades)?;
    println!(
        "Results saved to {}.",
        config.backtest.output.display()
    );
    Ok(())
}

fn cmd_split(results: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    let written = split_by_rr_level(results, output_dir)?;
    println!("Wrote {} per-level files to {}.", written.len(), output_dir.display());
    Ok(())
}

fn cmd_portfolio(
    input_dir: &PathBuf,
    output: &PathBuf,
    equity_dir: &PathBuf,
    initial_balance: f64,
    start_date: Option<&str>,
) -> Result<()> {
    let start = start_date
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("bad start date '{raw}'"))
        })
        .transpose()?;
    let all_stats = simulate_directory(input_dir, output, equity_dir, initial_balance, start)?;
    for (level, stats) in &all_stats {
        println!(
            "RR {level}: {} trades, final balance {:.2} ({:+.2}%), max drawdown {:.2}%",
            stats.total_trades, stats.final_balance, stats.total_return_pct, stats.max_drawdown_pct
        );
    }
    println!("Combined stats saved to {}.", output.display());
    Ok(())
}
