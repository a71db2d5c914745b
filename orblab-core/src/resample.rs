//! OHLC resampling — aggregate 1-minute bars into N-minute buckets.
//!
//! Buckets are aligned to midnight: a bar belongs to the bucket whose
//! start is its timestamp floored to a multiple of the bucket width.
//! Aggregation is open = first, high = max, low = min, close = last,
//! volume = sum; buckets that end up with zero volume are dropped, which
//! upholds the resampler contract the engine relies on.

use crate::domain::Bar;
use chrono::{NaiveDateTime, Timelike};

/// Floor a timestamp to the start of its `minutes`-wide bucket.
fn bucket_start(timestamp: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    let time = timestamp.time();
    let minute_of_day = time.hour() * 60 + time.minute();
    let floored = minute_of_day - minute_of_day % minutes;
    timestamp
        .date()
        .and_hms_opt(floored / 60, floored % 60, 0)
        .expect("floored bucket time is valid")
}

/// Aggregate a sorted 1-minute series into `minutes`-wide OHLCV bars.
pub fn resample(bars_1m: &[Bar], minutes: u32) -> Vec<Bar> {
    assert!(minutes >= 1, "bucket width must be at least one minute");

    let mut out: Vec<Bar> = Vec::new();

    for bar in bars_1m {
        let start = bucket_start(bar.timestamp, minutes);
        match out.last_mut() {
            Some(current) if current.timestamp == start => {
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => out.push(Bar {
                timestamp: start,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            }),
        }
    }

    out.retain(|b| b.volume > 0);
    out
}
