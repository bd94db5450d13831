use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Grade, SessionName, VolatilityRegime};

/// One named sub-score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    pub value: f64,
    /// True when the scorer could not compute and its fallback was used.
    #[serde(default)]
    pub fallback: bool,
}

impl ComponentScore {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: value.clamp(0.0, 1.0),
            fallback: false,
        }
    }

    pub fn fallback(name: &str, value: f64) -> Self {
        Self {
            fallback: true,
            ..Self::new(name, value)
        }
    }
}

/// Result of scoring one signal. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub composite_score: f64,
    pub grade: Grade,
    pub component_scores: BTreeMap<String, f64>,
    /// Fraction of components scoring >= 0.8.
    pub high_quality_ratio: f64,
    pub agreement_bonus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: SessionName,
    pub multiplier: f64,
}

/// Suggested trade management for an approved grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedParams {
    pub tp_multiplier: f64,
    pub sl_multiplier: f64,
    pub tp_pips: f64,
    pub sl_pips: f64,
    pub trailing_stop: bool,
    pub break_even: bool,
    pub partial_close: bool,
}

/// Output of one pipeline run, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub symbol: String,
    pub should_trade: bool,
    pub grade: Grade,
    pub composite_score: f64,
    pub adjusted_confidence: f64,
    pub position_multiplier: f64,
    pub final_threshold: f64,
    pub tp_price: Option<f64>,
    pub sl_price: Option<f64>,
    pub session: SessionInfo,
    pub regime: VolatilityRegime,
    pub component_scores: BTreeMap<String, f64>,
    pub reasons: Vec<String>,
    pub recommended: Option<RecommendedParams>,
}

impl TradeDecision {
    pub fn summary(&self) -> String {
        format!(
            "{} {} | {} | score {:.3} | conf {:.3} | size x{:.2}",
            self.symbol,
            if self.should_trade { "APPROVED" } else { "REJECTED" },
            self.grade,
            self.composite_score,
            self.adjusted_confidence,
            self.position_multiplier,
        )
    }
}
