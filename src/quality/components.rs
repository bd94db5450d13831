use tracing::debug;

use crate::config::{
    MARKET_STRUCTURE, MOMENTUM_ALIGNMENT, RISK_REWARD, SESSION_SUITABILITY, SPREAD_QUALITY,
    TECHNICAL_CONFLUENCE, VOLATILITY_HEALTH, VOLUME_CONFIRMATION,
};
use crate::core::profiles::SymbolProfile;
use crate::core::sessions;
use crate::error::ScoreFault;
use crate::models::{mean, percentile, std_dev, ComponentScore, Direction, MarketSnapshot, Signal};

pub const NEUTRAL_SCORE: f64 = 0.5;

/// Everything a scorer may look at for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub signal: &'a Signal,
    pub snapshot: &'a MarketSnapshot,
    pub profile: &'a SymbolProfile,
    /// UTC hour of the snapshot.
    pub hour: u32,
    /// Current spread in pips, when known.
    pub spread_pips: Option<f64>,
    /// Distances of the resolved TP and SL from the reference price.
    pub tp_sl_distances: Option<(f64, f64)>,
}

/// One quality dimension. `score` may fail; [`run_scorer`] turns any fault
/// into the scorer's `fallback`.
pub trait ComponentScorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault>;

    fn fallback(&self, _fault: &ScoreFault) -> f64 {
        NEUTRAL_SCORE
    }
}

/// Run a scorer, absorbing faults and clamping the result into `[0, 1]`.
pub fn run_scorer(scorer: &dyn ComponentScorer, ctx: &ScoringContext<'_>) -> ComponentScore {
    let name = scorer.name();
    let fault = match scorer.score(ctx) {
        Ok(v) if v.is_finite() => return ComponentScore::new(name, v),
        Ok(v) => ScoreFault::ComputationFault(format!("non-finite score {}", v)),
        Err(fault) => fault,
    };
    let value = scorer.fallback(&fault);
    debug!(
        "{} {}: {} -> fallback {:.2}",
        ctx.signal.symbol, name, fault, value
    );
    ComponentScore::fallback(name, value)
}

pub fn default_scorers() -> Vec<Box<dyn ComponentScorer>> {
    vec![
        Box::new(TechnicalConfluence),
        Box::new(SpreadQuality),
        Box::new(MarketStructure),
        Box::new(VolumeConfirmation),
        Box::new(MomentumAlignment),
        Box::new(SessionSuitability),
        Box::new(VolatilityHealth),
        Box::new(RiskReward),
    ]
}

fn require_bars(ctx: &ScoringContext<'_>, needed: usize) -> Result<(), ScoreFault> {
    let available = ctx.snapshot.bars.len();
    if available < needed {
        return Err(ScoreFault::InsufficientData { needed, available });
    }
    Ok(())
}

/// +1 for a rise, -1 for a fall, 0 when flat.
fn change_sign(from: f64, to: f64) -> f64 {
    let change = to - from;
    if change > 0.0 {
        1.0
    } else if change < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// ─── Technical confluence ────────────────────────────────────────────

pub struct TechnicalConfluence;

impl ComponentScorer for TechnicalConfluence {
    fn name(&self) -> &str {
        TECHNICAL_CONFLUENCE
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        let direction = ctx.signal.direction;
        let (total, agreeing) = ctx
            .snapshot
            .indicators
            .votes()
            .fold((0usize, 0usize), |(t, a), vote| {
                (t + 1, a + usize::from(vote.agrees_with(direction)))
            });
        if total == 0 {
            return Err(ScoreFault::MissingField("indicators"));
        }
        let ratio = agreeing as f64 / total as f64;
        if ratio >= 0.8 {
            Ok((ratio + 0.15).min(1.0))
        } else {
            Ok(ratio)
        }
    }
}

// ─── Spread quality ──────────────────────────────────────────────────

pub struct SpreadQuality;

impl ComponentScorer for SpreadQuality {
    fn name(&self) -> &str {
        SPREAD_QUALITY
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        let spread = ctx.spread_pips.ok_or(ScoreFault::MissingField("spread"))?;
        let max = ctx.profile.max_spread;
        if max <= 0.0 {
            return Err(ScoreFault::ComputationFault("max_spread is not positive".into()));
        }
        Ok(if spread <= max * 0.5 {
            1.0
        } else if spread <= max {
            0.8
        } else if spread <= max * 1.5 {
            0.5
        } else if spread <= max * 2.0 {
            0.3
        } else {
            0.1
        })
    }

    fn fallback(&self, _fault: &ScoreFault) -> f64 {
        0.7
    }
}

// ─── Market structure ────────────────────────────────────────────────

const STRUCTURE_MIN_BARS: usize = 10;
const LEVEL_PROXIMITY: f64 = 0.002;

pub struct MarketStructure;

impl ComponentScorer for MarketStructure {
    fn name(&self) -> &str {
        MARKET_STRUCTURE
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        require_bars(ctx, STRUCTURE_MIN_BARS)?;
        let bars = &ctx.snapshot.bars;
        let closes = bars.tail_closes(10);
        let current = closes[closes.len() - 1];
        let five_back = closes[closes.len() - 5];
        if current <= 0.0 {
            return Err(ScoreFault::ComputationFault("non-positive close".into()));
        }

        let direction = ctx.signal.direction;
        let trend = if current - five_back > 0.0 { 1.0 } else { -1.0 };
        let trend_score: f64 = if trend == direction.sign() { 0.6 } else { 0.3 };

        let level = match direction {
            Direction::Buy => percentile(&bars.tail_lows(20), 5.0),
            Direction::Sell => percentile(&bars.tail_highs(20), 95.0),
        }
        .ok_or_else(|| ScoreFault::ComputationFault("no finite highs/lows".into()))?;

        let near = (current - level).abs() / current < LEVEL_PROXIMITY;
        let structure_score = if near { 0.4 } else { 0.2 };

        Ok((trend_score + structure_score).min(1.0))
    }

    fn fallback(&self, fault: &ScoreFault) -> f64 {
        match fault {
            ScoreFault::InsufficientData { .. } => 0.4,
            _ => NEUTRAL_SCORE,
        }
    }
}

// ─── Volume confirmation ─────────────────────────────────────────────

pub struct VolumeConfirmation;

impl ComponentScorer for VolumeConfirmation {
    fn name(&self) -> &str {
        VOLUME_CONFIRMATION
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        require_bars(ctx, 10)?;
        let bars = &ctx.snapshot.bars;
        let average = mean(&bars.tail_volumes(20)).unwrap_or(0.0);
        if average.is_nan() || average <= 0.0 {
            return Err(ScoreFault::MissingField("volume"));
        }
        let recent = mean(&bars.tail_volumes(3)).unwrap_or(0.0);

        let ratio = recent / average;
        Ok(if ratio >= 1.5 {
            1.0
        } else if ratio >= 1.2 {
            0.8
        } else if ratio >= 0.8 {
            0.6
        } else {
            0.3
        })
    }

    fn fallback(&self, _fault: &ScoreFault) -> f64 {
        0.6
    }
}

// ─── Momentum alignment ──────────────────────────────────────────────

pub struct MomentumAlignment;

impl ComponentScorer for MomentumAlignment {
    fn name(&self) -> &str {
        MOMENTUM_ALIGNMENT
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        require_bars(ctx, 10)?;
        let closes = ctx.snapshot.bars.tail_closes(10);
        let n = closes.len();
        let current = closes[n - 1];
        let sign = ctx.signal.direction.sign();

        let mut score = 0.0;
        if change_sign(closes[n - 5], current) == sign {
            score += 0.5;
        }
        if change_sign(closes[n - 10], current) == sign {
            score += 0.5;
        }
        Ok(score)
    }
}

// ─── Session suitability ─────────────────────────────────────────────

pub struct SessionSuitability;

impl ComponentScorer for SessionSuitability {
    fn name(&self) -> &str {
        SESSION_SUITABILITY
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        Ok(sessions::session_suitability(&ctx.signal.symbol, ctx.hour))
    }

    fn fallback(&self, _fault: &ScoreFault) -> f64 {
        0.7
    }
}

// ─── Volatility health ───────────────────────────────────────────────

const VOLATILITY_WINDOW: usize = 14;

pub struct VolatilityHealth;

impl ComponentScorer for VolatilityHealth {
    fn name(&self) -> &str {
        VOLATILITY_HEALTH
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        require_bars(ctx, VOLATILITY_WINDOW)?;
        let closes = ctx.snapshot.bars.tail_closes(VOLATILITY_WINDOW);
        let returns: Vec<f64> = closes
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();
        let volatility = std_dev(&returns).ok_or(ScoreFault::MissingField("returns"))?;

        let min = ctx.profile.min_volatility;
        Ok(if volatility >= min * 0.5 && volatility <= min * 3.0 {
            0.9
        } else if volatility >= min * 0.3 && volatility < min * 0.5 {
            0.7
        } else if volatility >= min * 0.1 && volatility < min * 0.3 {
            0.5
        } else {
            0.3
        })
    }
}

// ─── Risk / reward ───────────────────────────────────────────────────

pub struct RiskReward;

impl ComponentScorer for RiskReward {
    fn name(&self) -> &str {
        RISK_REWARD
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<f64, ScoreFault> {
        let (tp, sl) = ctx.tp_sl_distances.ok_or(ScoreFault::MissingField("tp/sl"))?;
        if !(tp > 0.0 && sl > 0.0) {
            return Err(ScoreFault::MissingField("tp/sl"));
        }
        let ratio = tp / sl;
        Ok(if ratio >= 2.0 {
            1.0
        } else if ratio >= 1.5 {
            0.8
        } else if ratio >= 1.0 {
            0.6
        } else {
            0.3
        })
    }
}
