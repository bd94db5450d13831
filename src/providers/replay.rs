use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::models::{
    AccountSnapshot, Candle, CandleSeries, IndicatorSnapshot, MarketSnapshot, SymbolSpec, Timeframe,
};
use crate::providers::{AccountInfoProvider, MarketDataProvider, SymbolSpecProvider};

/// Recorded market state for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySymbol {
    pub symbol: String,
    #[serde(default)]
    pub spec: Option<SymbolSpec>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub indicators: IndicatorSnapshot,
    pub candles: Vec<Candle>,
}

/// On-disk replay file: one account plus any number of symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFile {
    pub account: AccountSnapshot,
    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,
    pub symbols: Vec<ReplaySymbol>,
}

fn default_timeframe() -> Timeframe {
    Timeframe::M1
}

/// Serves snapshots from pre-recorded data. A cursor (`now`) controls which
/// candles are visible: only candles with timestamp <= now are returned.
/// Clones are independent: each keeps its own cursor.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    symbols: HashMap<String, ReplaySymbol>,
    account: AccountSnapshot,
    timeframe: Timeframe,
    now: DateTime<Utc>,
}

impl ReplayProvider {
    pub fn new(account: AccountSnapshot, timeframe: Timeframe) -> Self {
        Self {
            symbols: HashMap::new(),
            account,
            timeframe,
            now: Utc::now(),
        }
    }

    /// Load a replay file. The cursor starts at the latest candle.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay file {}", path.display()))?;
        let file: ReplayFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing replay file {}", path.display()))?;

        let mut provider = Self::new(file.account, file.timeframe);
        for symbol in file.symbols {
            provider.load(symbol);
        }
        if let Some(latest) = provider.latest_time() {
            provider.set_time(latest);
        }
        Ok(provider)
    }

    /// Add or replace a symbol. Candles are sorted oldest-first.
    pub fn load(&mut self, mut data: ReplaySymbol) {
        data.candles.sort_by_key(|c| c.timestamp);
        self.symbols.insert(data.symbol.to_uppercase(), data);
    }

    pub fn set_time(&mut self, t: DateTime<Utc>) {
        self.now = t;
    }

    pub fn current_time(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.symbols
            .values()
            .filter_map(|s| s.candles.last().map(|c| c.timestamp))
            .max()
    }

    fn lookup(&self, symbol: &str) -> Result<&ReplaySymbol> {
        self.symbols
            .get(&symbol.to_uppercase())
            .with_context(|| format!("no replay data for {}", symbol))
    }

    /// Candles up to `self.now`, capped at `limit`.
    fn visible_candles(&self, data: &ReplaySymbol, limit: usize) -> CandleSeries {
        let end = data.candles.partition_point(|c| c.timestamp <= self.now);
        let start = end.saturating_sub(limit);
        CandleSeries::new(data.candles[start..end].to_vec())
    }
}

#[async_trait]
impl MarketDataProvider for ReplayProvider {
    async fn get_snapshot(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<MarketSnapshot> {
        if timeframe != self.timeframe {
            bail!(
                "replay data is recorded at {}, requested {}",
                self.timeframe,
                timeframe
            );
        }
        let data = self.lookup(symbol)?;
        let bars = self.visible_candles(data, bar_count);

        let mut snapshot = MarketSnapshot::new(&data.symbol, bars, self.now);
        snapshot.timeframe = timeframe;
        snapshot.indicators = data.indicators.clone();
        snapshot.bid = data.bid;
        snapshot.ask = data.ask;
        snapshot.spread = data.spread;
        if let Some(spec) = data.spec {
            snapshot.spec = spec;
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl AccountInfoProvider for ReplayProvider {
    async fn get_balance_equity(&mut self) -> Result<AccountSnapshot> {
        Ok(self.account.clone())
    }
}

#[async_trait]
impl SymbolSpecProvider for ReplayProvider {
    async fn get_spec(&mut self, symbol: &str) -> Result<SymbolSpec> {
        self.lookup(symbol)?
            .spec
            .with_context(|| format!("no recorded symbol spec for {}", symbol))
    }
}
