//! Bar series loading and validation.
//!
//! Reads the three input series (15-minute and 5-minute headered CSVs,
//! headerless 1-minute CSV), parses timestamps, enforces strictly
//! ascending order, filters everything to the inception date, and hashes
//! the filtered data for reproducibility. Session boundaries cannot be
//! determined from a broken timestamp column, so any parse or ordering
//! failure is fatal for the run.

use chrono::{NaiveDate, NaiveDateTime};
use orblab_core::domain::Bar;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the data loading layer. All fatal: the run aborts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{path}: record {record}: expected 6 fields, found {found}")]
    FieldCount {
        path: PathBuf,
        record: usize,
        found: usize,
    },

    #[error("{path}: record {record}: unparsable timestamp '{value}'")]
    Timestamp {
        path: PathBuf,
        record: usize,
        value: String,
    },

    #[error("{path}: record {record}: invalid numeric field '{value}'")]
    Numeric {
        path: PathBuf,
        record: usize,
        value: String,
    },

    #[error("{path}: timestamps not strictly ascending at {timestamp}")]
    Unsorted {
        path: PathBuf,
        timestamp: NaiveDateTime,
    },

    #[error("{path}: no bars on or after inception date {inception}")]
    EmptyAfterFilter { path: PathBuf, inception: NaiveDate },
}

/// The three fully loaded, validated, inception-filtered bar series.
///
/// Read-only for the remainder of the run.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub bars_15m: Vec<Bar>,
    pub bars_5m: Vec<Bar>,
    pub bars_1m: Vec<Bar>,
    /// BLAKE3 hash over all three filtered series, for run provenance.
    pub dataset_hash: String,
}

/// Load the three bar series and filter them to the inception date.
pub fn load_market_data(
    file_15min: &Path,
    file_5min: &Path,
    file_1min: &Path,
    inception: NaiveDate,
) -> Result<MarketData, LoadError> {
    let bars_15m = load_series(file_15min, true, inception)?;
    let bars_5m = load_series(file_5min, true, inception)?;
    let bars_1m = load_series(file_1min, false, inception)?;

    let dataset_hash = compute_dataset_hash(&[&bars_15m, &bars_5m, &bars_1m]);

    Ok(MarketData {
        bars_15m,
        bars_5m,
        bars_1m,
        dataset_hash,
    })
}

/// Load one series: read, validate ordering, filter to inception.
fn load_series(path: &Path, has_headers: bool, inception: NaiveDate) -> Result<Vec<Bar>, LoadError> {
    let bars = read_sorted_bars_csv(path, has_headers)?;

    let inception_start = inception.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let from = bars.partition_point(|b| b.timestamp < inception_start);
    let filtered = bars[from..].to_vec();

    if filtered.is_empty() {
        return Err(LoadError::EmptyAfterFilter {
            path: path.to_path_buf(),
            inception,
        });
    }
    Ok(filtered)
}

/// Read a bar CSV with fixed column order Datetime,Open,High,Low,Close,Volume.
pub fn read_bars_csv(path: &Path, has_headers: bool) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut bars = Vec::new();
    for (record, result) in reader.records().enumerate() {
        let row = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if row.len() != 6 {
            return Err(LoadError::FieldCount {
                path: path.to_path_buf(),
                record,
                found: row.len(),
            });
        }

        let raw_ts = &row[0];
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::Timestamp {
            path: path.to_path_buf(),
            record,
            value: raw_ts.to_string(),
        })?;

        let number = |value: &str| -> Result<f64, LoadError> {
            value.trim().parse::<f64>().map_err(|_| LoadError::Numeric {
                path: path.to_path_buf(),
                record,
                value: value.to_string(),
            })
        };

        bars.push(Bar {
            timestamp,
            open: number(&row[1])?,
            high: number(&row[2])?,
            low: number(&row[3])?,
            close: number(&row[4])?,
            // Volume may arrive as a float (resampled sums); round it.
            volume: number(&row[5])?.round().max(0.0) as u64,
        });
    }
    Ok(bars)
}

/// Read a bar CSV and enforce strictly ascending timestamps.
///
/// Every consumer of a bar series assumes sorted input: the resampler
/// merges only into the most recent bucket, so out-of-order rows would
/// silently emit the same bucket twice.
pub fn read_sorted_bars_csv(path: &Path, has_headers: bool) -> Result<Vec<Bar>, LoadError> {
    let bars = read_bars_csv(path, has_headers)?;
    validate_ascending(path, &bars)?;
    Ok(bars)
}

/// Write bars as a headered CSV (Datetime,Open,High,Low,Close,Volume).
///
/// Used by the resample command to produce the 5- and 15-minute inputs.
pub fn write_bars_csv(path: &Path, bars: &[Bar]) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let write = |writer: &mut csv::Writer<std::fs::File>, row: [String; 6]| {
        writer.write_record(&row).map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
    };
    write(
        &mut writer,
        [
            "Datetime".into(),
            "Open".into(),
            "High".into(),
            "Low".into(),
            "Close".into(),
            "Volume".into(),
        ],
    )?;
    for bar in bars {
        write(
            &mut writer,
            [
                bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.6}", bar.open),
                format!("{:.6}", bar.high),
                format!("{:.6}", bar.low),
                format!("{:.6}", bar.close),
                bar.volume.to_string(),
            ],
        )?;
    }
    writer.flush().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source: csv::Error::from(source),
    })
}

/// Parse a bar timestamp, with or without a seconds component.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()
}

fn validate_ascending(path: &Path, bars: &[Bar]) -> Result<(), LoadError> {
    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(LoadError::Unsorted {
                path: path.to_path_buf(),
                timestamp: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

/// Deterministic BLAKE3 hash over the given series, in order.
fn compute_dataset_hash(series: &[&[Bar]]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bars in series {
        for bar in *bars {
            hasher.update(bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const HEADERED: &str = "\
Datetime,Open,High,Low,Close,Volume
2024-06-03 09:30:00,102.0,105.0,100.0,104.0,1000
2024-06-03 09:45:00,104.0,106.0,103.5,105.8,900
";

    #[test]
    fn reads_headered_bars() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bars.csv", HEADERED);
        let bars = read_bars_csv(&path, true).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].high, 105.0);
        assert_eq!(bars[1].volume, 900);
    }

    #[test]
    fn reads_headerless_bars_with_minute_precision_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "bars.csv",
            "2024-06-03 09:30,102.0,105.0,100.0,104.0,1000\n",
        );
        let bars = read_bars_csv(&path, false).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].time().format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn unparsable_timestamp_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bars.csv", "yesterday,1,2,0.5,1.5,10\n");
        let err = read_bars_csv(&path, false).unwrap_err();
        assert!(matches!(err, LoadError::Timestamp { record: 0, .. }));
    }

    #[test]
    fn out_of_order_timestamps_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "bars.csv",
            "2024-06-03 09:31,1,2,0.5,1.5,10\n2024-06-03 09:30,1,2,0.5,1.5,10\n",
        );
        let bars_err = load_series(&path, false, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(matches!(bars_err.unwrap_err(), LoadError::Unsorted { .. }));
    }

    #[test]
    fn sorted_read_rejects_out_of_order_resample_input() {
        // An unsorted 1-minute file must abort before bucketing: the
        // resampler would otherwise emit the 09:30 bucket twice.
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "bars.csv",
            "2024-06-03 09:31,1,2,0.5,1.5,10\n\
             2024-06-03 09:36,1,2,0.5,1.5,10\n\
             2024-06-03 09:32,1,2,0.5,1.5,10\n",
        );
        let err = read_sorted_bars_csv(&path, false).unwrap_err();
        assert!(matches!(err, LoadError::Unsorted { .. }));
    }

    #[test]
    fn inception_filter_can_empty_a_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bars.csv", HEADERED);
        let err = load_series(&path, true, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(
            err.unwrap_err(),
            LoadError::EmptyAfterFilter { .. }
        ));
    }

    #[test]
    fn inception_filter_keeps_bars_on_the_boundary_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bars.csv", HEADERED);
        let bars = load_series(&path, true, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn dataset_hash_is_deterministic_and_input_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let p15 = write_file(&dir, "b15.csv", HEADERED);
        let p5 = write_file(&dir, "b5.csv", HEADERED);
        let p1 = write_file(
            &dir,
            "b1.csv",
            "2024-06-03 09:30:00,102.0,105.0,100.0,104.0,1000\n",
        );
        let inception = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let first = load_market_data(&p15, &p5, &p1, inception).unwrap();
        let second = load_market_data(&p15, &p5, &p1, inception).unwrap();
        assert_eq!(first.dataset_hash, second.dataset_hash);

        let p1_alt = write_file(
            &dir,
            "b1_alt.csv",
            "2024-06-03 09:30:00,102.0,105.0,100.0,104.5,1000\n",
        );
        let third = load_market_data(&p15, &p5, &p1_alt, inception).unwrap();
        assert_ne!(first.dataset_hash, third.dataset_hash);
    }

    #[test]
    fn bars_roundtrip_through_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "in.csv", HEADERED);
        let bars = read_bars_csv(&path, true).unwrap();
        let out = dir.path().join("out.csv");
        write_bars_csv(&out, &bars).unwrap();
        let reread = read_bars_csv(&out, true).unwrap();
        assert_eq!(bars, reread);
    }
}
