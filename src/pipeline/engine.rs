use chrono::Timelike;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::sessions::session_at;
use crate::core::sizing::{position_multiplier, recommended_params};
use crate::core::tp_sl::{enforce_min_distance, pip_size, TpSlCalculator};
use crate::core::volatility::{detect_regime, regime_adjustment};
use crate::models::{
    AccountSnapshot, Direction, Grade, LevelKind, LevelRequest, MarketSnapshot, Signal, TradeDecision,
};
use crate::pipeline::stats::{PipelineStatistics, StatisticsSnapshot};
use crate::quality::{
    assess, default_scorers, evaluate_gate, run_scorer, ComponentScorer, GateInput, ScoringContext,
};

const MAX_ADJUSTED_CONFIDENCE: f64 = 0.95;
const CONFIDENCE_BOOST: f64 = 0.3;

/// Scores, grades and gates one signal at a time. Holds its configuration
/// and statistics; shareable across threads behind an `Arc`.
pub struct SignalPipeline {
    config: Config,
    scorers: Vec<Box<dyn ComponentScorer>>,
    stats: PipelineStatistics,
}

impl SignalPipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scorers: default_scorers(),
            stats: PipelineStatistics::new(),
        }
    }

    /// Add a scorer after the built-in ones. Its weight comes from the
    /// config, or the default weight if unlisted.
    pub fn with_scorer(mut self, scorer: Box<dyn ComponentScorer>) -> Self {
        self.scorers.push(scorer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn statistics(&self) -> &PipelineStatistics {
        &self.stats
    }

    pub fn get_statistics(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_statistics(&self) {
        self.stats.reset();
        info!("Pipeline statistics reset");
    }

    pub fn record_outcome(&self, grade: Grade, won: bool) {
        self.stats.record_outcome(grade, won);
    }

    /// Always returns a decision; every internal failure ends up in a
    /// fallback score or in `reasons`.
    pub fn evaluate(
        &self,
        signal: &Signal,
        snapshot: &MarketSnapshot,
        account: &AccountSnapshot,
    ) -> TradeDecision {
        let cfg = &self.config;
        let mut reasons = Vec::new();

        let confidence = if signal.confidence.is_finite() {
            signal.confidence.clamp(0.0, 1.0)
        } else {
            reasons.push(format!("Confidence {} is not a number, using 0", signal.confidence));
            0.0
        };
        let lot_size = if signal.lot_size.is_finite() && signal.lot_size > 0.0 {
            signal.lot_size
        } else {
            cfg.default_lot_size
        };

        let profile = cfg.profile_for(&signal.symbol);
        let hour = snapshot.as_of.hour();
        let session = session_at(snapshot.as_of, &cfg.session_multipliers);
        let regime = detect_regime(&snapshot.bars, profile, &cfg.regime_bands);
        let adjustment = regime_adjustment(regime);
        let spread_pips = snapshot.spread_pips(snapshot.spec.point * 10.0);

        // TP/SL levels
        let reference = snapshot.reference_price(signal.direction);
        let calculator = TpSlCalculator::new(&signal.symbol, snapshot.spec).with_account(account);
        let (tp_price, sl_price) = match reference {
            Some(price) => {
                let mut level = |request: Option<&LevelRequest>, kind| {
                    resolve_level(&calculator, request, kind, signal.direction, price, lot_size, &mut reasons)
                };
                let tp = level(signal.take_profit.as_ref(), LevelKind::TakeProfit);
                let sl = level(signal.stop_loss.as_ref(), LevelKind::StopLoss);
                (tp, sl)
            }
            None => {
                if signal.take_profit.is_some() || signal.stop_loss.is_some() {
                    reasons.push("TP/SL skipped: no reference price in snapshot".to_string());
                }
                (None, None)
            }
        };
        let tp_sl_distances = match (reference, tp_price, sl_price) {
            (Some(p), Some(tp), Some(sl)) => Some(((tp - p).abs(), (sl - p).abs())),
            _ => None,
        };

        // Scoring
        let ctx = ScoringContext {
            signal,
            snapshot,
            profile,
            hour,
            spread_pips,
            tp_sl_distances,
        };
        let scores: Vec<_> = self
            .scorers
            .iter()
            .map(|scorer| run_scorer(scorer.as_ref(), &ctx))
            .collect();
        let assessment = assess(&scores, cfg);

        // Gate
        let gate = evaluate_gate(&GateInput {
            grade: assessment.grade,
            composite_score: assessment.composite_score,
            confidence,
            base_confidence: profile.base_confidence,
            session,
            adjustment,
            min_composite_score: cfg.min_composite_score,
        });
        let should_trade = gate.should_trade;
        let final_threshold = gate.final_threshold;
        let reasons: Vec<String> = gate.reasons.into_iter().chain(reasons).collect();

        let multiplier =
            position_multiplier(assessment.grade, assessment.composite_score, session.multiplier);
        let adjusted_confidence = if should_trade {
            let boosted = (confidence * (1.0 + assessment.composite_score * CONFIDENCE_BOOST))
                .min(MAX_ADJUSTED_CONFIDENCE);
            (boosted + adjustment.confidence_bonus).clamp(0.0, 1.0)
        } else {
            confidence
        };

        let recommended = if should_trade {
            let pip = pip_size(&signal.symbol);
            let (tp_pips, sl_pips) = tp_sl_distances
                .map(|(tp, sl)| (tp / pip, sl / pip))
                .unwrap_or((0.0, 0.0));
            recommended_params(assessment.grade, tp_pips, sl_pips)
        } else {
            None
        };

        self.stats.record(assessment.grade, should_trade);

        let decision = TradeDecision {
            symbol: signal.symbol.clone(),
            should_trade,
            grade: assessment.grade,
            composite_score: assessment.composite_score,
            adjusted_confidence,
            position_multiplier: multiplier,
            final_threshold,
            tp_price,
            sl_price,
            session,
            regime,
            component_scores: assessment.component_scores,
            reasons,
            recommended,
        };

        if should_trade {
            info!("{} {}", signal.direction, decision.summary());
        } else {
            debug!("{} {}", signal.direction, decision.summary());
        }
        decision
    }
}

/// Resolve one requested level and push it out to the minimum stop
/// distance. Conversion errors become a reason and an absent level.
#[allow(clippy::too_many_arguments)]
fn resolve_level(
    calculator: &TpSlCalculator,
    request: Option<&LevelRequest>,
    kind: LevelKind,
    direction: Direction,
    price: f64,
    lot_size: f64,
    reasons: &mut Vec<String>,
) -> Option<f64> {
    let request = request?;
    match calculator.resolve_request(request, kind, direction, price, lot_size) {
        Ok(Some(level)) => {
            let clamped = enforce_min_distance(
                level,
                kind,
                direction,
                price,
                calculator.min_stop_distance(),
                calculator.spec().digits,
            );
            if clamped.adjusted {
                reasons.push(format!(
                    "{} moved from {} to {} (minimum stop distance)",
                    kind, level, clamped.price
                ));
            }
            Some(clamped.price)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("{} [{} {}] ignored: {}", kind, request.value, request.unit, e);
            reasons.push(format!("{} ignored: {}", kind, e));
            None
        }
    }
}
