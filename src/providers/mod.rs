pub mod replay;

pub use replay::ReplayProvider;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AccountSnapshot, MarketSnapshot, SymbolSpec, Timeframe};

/// Source of already-fetched market state.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_snapshot(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<MarketSnapshot>;
}

#[async_trait]
pub trait AccountInfoProvider: Send + Sync {
    async fn get_balance_equity(&mut self) -> Result<AccountSnapshot>;
}

#[async_trait]
pub trait SymbolSpecProvider: Send + Sync {
    async fn get_spec(&mut self, symbol: &str) -> Result<SymbolSpec>;
}
