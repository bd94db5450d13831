#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use signal_gate::config::Config;
use signal_gate::models::{Candle, CandleSeries, IndicatorVote, MarketSnapshot};

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
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

/// Snapshot whose clock reads `hour`:30 UTC.
pub fn snapshot_at_hour(symbol: &str, bars: CandleSeries, hour: u32) -> MarketSnapshot {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 15, hour, 30, 0).unwrap();
    MarketSnapshot::new(symbol, bars, as_of)
}

/// 40 rising bars, a tight spread and every indicator voting BUY.
pub fn bullish_snapshot(symbol: &str, hour: u32) -> MarketSnapshot {
    let mut snap = snapshot_at_hour(symbol, make_bullish_trend(40, 1000.0), hour);
    snap.spread = Some(1.0);
    snap.indicators.ema = Some(IndicatorVote::Buy);
    snap.indicators.rsi = Some(IndicatorVote::Buy);
    snap.indicators.macd = Some(IndicatorVote::Buy);
    snap.indicators.bollinger = Some(IndicatorVote::Buy);
    snap.indicators.stochastic = Some(IndicatorVote::Buy);
    snap
}

pub fn test_config() -> Config {
    Config {
        log_level: "ERROR".to_string(),
        ..Config::default()
    }
}
