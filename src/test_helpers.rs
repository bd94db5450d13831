use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::Config;
use crate::models::{Candle, CandleSeries, MarketSnapshot};

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Create candles from (open, high, low, close) tuples with auto-incrementing 1m timestamps.
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = data
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: 100.0,
        })
        .collect();

    CandleSeries::new(candles)
}

/// Create n rising (bullish) candles starting from `start` price.
pub fn make_bullish_trend(n: usize, start: f64) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = (0..n)
        .map(|i| {
            let open = start + i as f64 * 10.0;
            let close = open + 8.0;
            Candle {
                timestamp: base + Duration::minutes(i as i64),
                open,
                high: close + 2.0,
                low: open - 1.0,
                close,
                volume: 100.0,
            }
        })
        .collect();

    CandleSeries::new(candles)
}

/// Create n falling (bearish) candles starting from `start` price.
pub fn make_bearish_trend(n: usize, start: f64) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = (0..n)
        .map(|i| {
            let open = start - i as f64 * 10.0;
            let close = open - 8.0;
            Candle {
                timestamp: base + Duration::minutes(i as i64),
                open,
                high: open + 1.0,
                low: close - 2.0,
                close,
                volume: 100.0,
            }
        })
        .collect();

    CandleSeries::new(candles)
}

/// n flat candles: open == close == `price`, each spanning exactly `range`.
pub fn make_ranging(n: usize, price: f64, range: f64) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = (0..n)
        .map(|i| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: price,
            high: price + range / 2.0,
            low: price - range / 2.0,
            close: price,
            volume: 100.0,
        })
        .collect();

    CandleSeries::new(candles)
}

/// Replace candle volumes in order; extra volumes are ignored.
pub fn with_volumes(series: CandleSeries, volumes: &[f64]) -> CandleSeries {
    let candles: Vec<Candle> = series
        .as_slice()
        .iter()
        .zip(volumes)
        .map(|(c, v)| Candle {
            volume: *v,
            ..c.clone()
        })
        .collect();
    CandleSeries::new(candles)
}

pub fn snapshot_with_bars(symbol: &str, bars: CandleSeries) -> MarketSnapshot {
    MarketSnapshot::new(symbol, bars, base_time())
}

/// Snapshot whose clock reads `hour`:30 UTC.
pub fn snapshot_at_hour(symbol: &str, bars: CandleSeries, hour: u32) -> MarketSnapshot {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 15, hour, 30, 0).unwrap();
    MarketSnapshot::new(symbol, bars, as_of)
}

/// Default tables, quiet logging.
pub fn default_test_config() -> Config {
    Config {
        log_level: "ERROR".to_string(),
        ..Config::default()
    }
}
