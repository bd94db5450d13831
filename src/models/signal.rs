use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CandleSeries, Direction, IndicatorVote, TpSlUnit, Timeframe};

/// A raw TP or SL request as typed by a user or strategy: a signed numeric
/// string plus a unit tag. Positive = take-profit distance, negative =
/// stop-loss distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRequest {
    pub value: String,
    pub unit: String,
}

impl LevelRequest {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }

    pub fn take_profit(value: impl Into<String>, unit: TpSlUnit) -> Self {
        Self::new(value, unit.as_str())
    }

    /// Stop-loss request. Distance units are stored negative so the sign
    /// places the level on the losing side; absolute prices are kept verbatim.
    pub fn stop_loss(value: impl Into<String>, unit: TpSlUnit) -> Self {
        let raw: String = value.into();
        let trimmed = raw.trim();
        let value = if unit == TpSlUnit::Price || trimmed.starts_with('-') {
            trimmed.to_string()
        } else {
            format!("-{}", trimmed)
        };
        Self::new(value, unit.as_str())
    }
}

/// Immutable input to one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    pub confidence: f64,
    #[serde(default = "default_lot_size")]
    pub lot_size: f64,
    #[serde(default)]
    pub take_profit: Option<LevelRequest>,
    #[serde(default)]
    pub stop_loss: Option<LevelRequest>,
}

fn default_lot_size() -> f64 {
    0.01
}

impl Signal {
    pub fn new(symbol: &str, direction: Direction, confidence: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            direction,
            confidence,
            lot_size: default_lot_size(),
            take_profit: None,
            stop_loss: None,
        }
    }

    pub fn with_lot_size(mut self, lot_size: f64) -> Self {
        self.lot_size = lot_size;
        self
    }

    pub fn with_take_profit(mut self, value: &str, unit: TpSlUnit) -> Self {
        self.take_profit = Some(LevelRequest::take_profit(value, unit));
        self
    }

    pub fn with_stop_loss(mut self, value: &str, unit: TpSlUnit) -> Self {
        self.stop_loss = Some(LevelRequest::stop_loss(value, unit));
        self
    }
}

/// Precomputed indicator votes. A `None` field means the indicator was not
/// available for this evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(default)]
    pub ema: Option<IndicatorVote>,
    #[serde(default)]
    pub rsi: Option<IndicatorVote>,
    #[serde(default)]
    pub macd: Option<IndicatorVote>,
    #[serde(default)]
    pub bollinger: Option<IndicatorVote>,
    #[serde(default)]
    pub stochastic: Option<IndicatorVote>,
}

impl IndicatorSnapshot {
    pub fn votes(&self) -> impl Iterator<Item = IndicatorVote> + '_ {
        [self.ema, self.rsi, self.macd, self.bollinger, self.stochastic]
            .into_iter()
            .flatten()
    }
}

/// Broker contract specification for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub digits: u32,
    pub point: f64,
    #[serde(default)]
    pub stops_level: u32,
    pub contract_size: f64,
}

impl SymbolSpec {
    /// Conventional spec per instrument family, used when no broker spec is
    /// available.
    pub fn for_symbol(symbol: &str) -> Self {
        let s = symbol.to_uppercase();
        if s.contains("XAU") || s.contains("GOLD") {
            Self {
                digits: 2,
                point: 0.01,
                stops_level: 0,
                contract_size: 100.0,
            }
        } else if s.contains("BTC") {
            Self {
                digits: 2,
                point: 0.01,
                stops_level: 0,
                contract_size: 1.0,
            }
        } else if s.contains("JPY") {
            Self {
                digits: 3,
                point: 0.001,
                stops_level: 0,
                contract_size: 100_000.0,
            }
        } else {
            Self {
                digits: 5,
                point: 0.00001,
                stops_level: 0,
                contract_size: 100_000.0,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: f64,
    pub equity: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl AccountSnapshot {
    pub fn new(balance: f64, equity: f64) -> Self {
        Self {
            balance,
            equity,
            currency: default_currency(),
        }
    }
}

/// Already-fetched market state for one symbol at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,
    #[serde(default)]
    pub bars: CandleSeries,
    #[serde(default)]
    pub indicators: IndicatorSnapshot,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    /// Current spread in pips, when the feed reports it directly.
    #[serde(default)]
    pub spread: Option<f64>,
    pub spec: SymbolSpec,
    /// Wall-clock time of the snapshot; drives session lookups.
    pub as_of: DateTime<Utc>,
}

fn default_timeframe() -> Timeframe {
    Timeframe::M1
}

impl MarketSnapshot {
    pub fn new(symbol: &str, bars: CandleSeries, as_of: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.to_string(),
            timeframe: default_timeframe(),
            bars,
            indicators: IndicatorSnapshot::default(),
            bid: None,
            ask: None,
            spread: None,
            spec: SymbolSpec::for_symbol(symbol),
            as_of,
        }
    }

    /// Reference price for TP/SL placement: ask for BUY, bid for SELL,
    /// falling back to the last close.
    pub fn reference_price(&self, direction: Direction) -> Option<f64> {
        let quote = match direction {
            Direction::Buy => self.ask,
            Direction::Sell => self.bid,
        };
        quote
            .filter(|p| p.is_finite() && *p > 0.0)
            .or_else(|| self.bars.last().map(|c| c.close))
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Spread in pips: the reported value, or derived from bid/ask.
    pub fn spread_pips(&self, pip_size: f64) -> Option<f64> {
        if let Some(s) = self.spread.filter(|s| s.is_finite() && *s >= 0.0) {
            return Some(s);
        }
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) if bid > 0.0 && ask >= bid && pip_size > 0.0 => {
                Some((ask - bid) / pip_size)
            }
            _ => None,
        }
    }
}
