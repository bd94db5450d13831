use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn total_range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous bar's close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        self.total_range()
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }
}

/// OHLCV history, most-recent-last.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn tail_closes(&self, n: usize) -> Vec<f64> {
        self.tail(n).iter().map(|c| c.close).collect()
    }

    pub fn tail_highs(&self, n: usize) -> Vec<f64> {
        self.tail(n).iter().map(|c| c.high).collect()
    }

    pub fn tail_lows(&self, n: usize) -> Vec<f64> {
        self.tail(n).iter().map(|c| c.low).collect()
    }

    pub fn tail_volumes(&self, n: usize) -> Vec<f64> {
        self.tail(n).iter().map(|c| c.volume).collect()
    }

    /// Mean true range of the last `period` bars. Needs `period + 1` bars so
    /// every bar in the window has a previous close.
    pub fn average_true_range(&self, period: usize) -> Option<f64> {
        if period == 0 || self.candles.len() < period + 1 {
            return None;
        }
        let window = self.tail(period + 1);
        let ranges: Vec<f64> = window
            .windows(2)
            .map(|pair| pair[1].true_range(pair[0].close))
            .collect();
        mean(&ranges)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Percentile with linear interpolation between closest ranks (`q` in 0..=100).
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_candles;

    #[test]
    fn true_range_uses_gap_from_previous_close() {
        let c = Candle {
            timestamp: Utc::now(),
            open: 105.0,
            high: 110.0,
            low: 104.0,
            close: 108.0,
            volume: 1.0,
        };
        assert!((c.true_range(107.0) - 6.0).abs() < 1e-9);
        // Gap up from 100: high - prev_close dominates
        assert!((c.true_range(100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn tail_is_clamped_to_len() {
        let s = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 112.0, 104.0, 110.0),
        ]);
        assert_eq!(s.tail(2).len(), 2);
        assert_eq!(s.tail(10).len(), 3);
        assert_eq!(s.tail_closes(2), vec![106.0, 110.0]);
    }

    #[test]
    fn atr_needs_one_extra_bar() {
        let s = make_candles(&[
            (100.0, 101.0, 99.0, 100.0),
            (100.0, 102.0, 100.0, 101.0),
        ]);
        assert!(s.average_true_range(2).is_none());
        // One window: TR = max(2, |102-100|, |100-100|) = 2
        assert!((s.average_true_range(1).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&v, 50.0).unwrap() - 3.0).abs() < 1e-9);
        assert!((percentile(&v, 95.0).unwrap() - 4.8).abs() < 1e-9);
        assert!((percentile(&v, 5.0).unwrap() - 1.2).abs() < 1e-9);
        assert!(percentile(&[], 50.0).is_none());
    }

    #[test]
    fn std_dev_is_population() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&v).unwrap() - 2.0).abs() < 1e-9);
    }
}
