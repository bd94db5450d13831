use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RegimeBands;
use crate::core::profiles::SymbolProfile;
use crate::models::{CandleSeries, VolatilityRegime};

/// Threshold and confidence shifts for a volatility regime. A positive
/// `threshold_reduction` makes the gate easier to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeAdjustment {
    pub threshold_reduction: f64,
    pub confidence_bonus: f64,
}

pub fn regime_adjustment(regime: VolatilityRegime) -> RegimeAdjustment {
    let (threshold_reduction, confidence_bonus) = match regime {
        VolatilityRegime::Low => (0.05, 0.10),
        VolatilityRegime::Normal => (0.0, 0.0),
        VolatilityRegime::High => (-0.05, -0.05),
        VolatilityRegime::Extreme => (-0.10, -0.10),
    };
    RegimeAdjustment {
        threshold_reduction,
        confidence_bonus,
    }
}

/// Classify ATR relative to the profile's minimum healthy volatility.
/// Too little history means NORMAL.
pub fn detect_regime(
    bars: &CandleSeries,
    profile: &SymbolProfile,
    bands: &RegimeBands,
) -> VolatilityRegime {
    let atr = match bars.average_true_range(bands.atr_period) {
        Some(v) if v.is_finite() => v,
        _ => {
            debug!(
                "Regime: {} bars < {} needed, assuming NORMAL",
                bars.len(),
                bands.atr_period + 1
            );
            return VolatilityRegime::Normal;
        }
    };
    if profile.min_volatility <= 0.0 {
        return VolatilityRegime::Normal;
    }

    let ratio = atr / profile.min_volatility;
    if ratio < bands.low {
        VolatilityRegime::Low
    } else if ratio < bands.normal {
        VolatilityRegime::Normal
    } else if ratio < bands.high {
        VolatilityRegime::High
    } else {
        VolatilityRegime::Extreme
    }
}
