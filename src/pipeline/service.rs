use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::models::{Signal, SymbolSpec, TradeDecision};
use crate::pipeline::SignalPipeline;
use crate::providers::{AccountInfoProvider, MarketDataProvider, SymbolSpecProvider};

/// Fetches everything a pipeline run needs from the providers, then
/// evaluates. Deadlines are imposed here, never inside the pipeline.
pub struct SignalService {
    pipeline: Arc<SignalPipeline>,
    market: Box<dyn MarketDataProvider>,
    account: Box<dyn AccountInfoProvider>,
    specs: Box<dyn SymbolSpecProvider>,
}

impl SignalService {
    pub fn new(
        pipeline: Arc<SignalPipeline>,
        market: Box<dyn MarketDataProvider>,
        account: Box<dyn AccountInfoProvider>,
        specs: Box<dyn SymbolSpecProvider>,
    ) -> Self {
        Self {
            pipeline,
            market,
            account,
            specs,
        }
    }

    pub fn pipeline(&self) -> &Arc<SignalPipeline> {
        &self.pipeline
    }

    pub async fn evaluate(&mut self, signal: &Signal) -> Result<TradeDecision> {
        let cfg = self.pipeline.config();
        let mut snapshot = self
            .market
            .get_snapshot(&signal.symbol, cfg.snapshot_timeframe, cfg.snapshot_bars)
            .await
            .with_context(|| format!("fetching snapshot for {}", signal.symbol))?;

        snapshot.spec = match self.specs.get_spec(&signal.symbol).await {
            Ok(spec) => spec,
            Err(e) => {
                warn!("{}: symbol spec unavailable ({}), using defaults", signal.symbol, e);
                SymbolSpec::for_symbol(&signal.symbol)
            }
        };

        let account = self
            .account
            .get_balance_equity()
            .await
            .context("fetching account balance/equity")?;

        Ok(self.pipeline.evaluate(signal, &snapshot, &account))
    }

    pub async fn evaluate_with_timeout(
        &mut self,
        signal: &Signal,
        deadline: Duration,
    ) -> Result<TradeDecision> {
        let symbol = signal.symbol.clone();
        tokio::time::timeout(deadline, self.evaluate(signal))
            .await
            .with_context(|| format!("evaluating {} timed out after {:?}", symbol, deadline))?
    }
}
