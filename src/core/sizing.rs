use crate::models::{Grade, RecommendedParams};

const SCORE_ADJUSTMENT_FACTOR: f64 = 0.4;
const SESSION_FACTOR_CAP: f64 = 1.5;
const MAX_MULTIPLIER: f64 = 3.0;

pub const DEFAULT_TP_PIPS: f64 = 15.0;
pub const DEFAULT_SL_PIPS: f64 = 8.0;

fn base_multiplier(grade: Grade) -> f64 {
    match grade {
        Grade::UltraHigh => 2.5,
        Grade::High => 2.0,
        Grade::Good => 1.6,
        Grade::Acceptable => 1.2,
        Grade::Low => 0.8,
        Grade::Reject => 0.0,
    }
}

/// Position-size multiplier in `[0, 3]`; exactly 0 for REJECT.
pub fn position_multiplier(grade: Grade, composite_score: f64, session_multiplier: f64) -> f64 {
    if grade == Grade::Reject {
        return 0.0;
    }
    let composite = if composite_score.is_finite() {
        composite_score.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let session = if session_multiplier.is_finite() && session_multiplier > 0.0 {
        session_multiplier.min(SESSION_FACTOR_CAP)
    } else {
        1.0
    };

    let score_adjustment = (composite - 0.5) * SCORE_ADJUSTMENT_FACTOR;
    let multiplier = (base_multiplier(grade) + score_adjustment) * session;
    multiplier.clamp(0.0, MAX_MULTIPLIER)
}

/// Trade management suggested for a grade, scaled from base TP/SL pip
/// distances. `None` for REJECT. Non-positive bases fall back to 15/8 pips.
pub fn recommended_params(grade: Grade, base_tp_pips: f64, base_sl_pips: f64) -> Option<RecommendedParams> {
    let (tp_multiplier, sl_multiplier, trailing_stop, break_even, partial_close) = match grade {
        Grade::UltraHigh => (2.5, 0.8, true, true, true),
        Grade::High => (2.0, 0.9, true, true, false),
        Grade::Good => (1.8, 1.0, true, false, false),
        Grade::Acceptable => (1.5, 1.0, false, false, false),
        Grade::Low => (1.2, 1.1, false, false, false),
        Grade::Reject => return None,
    };

    let tp_base = if base_tp_pips.is_finite() && base_tp_pips > 0.0 {
        base_tp_pips
    } else {
        DEFAULT_TP_PIPS
    };
    let sl_base = if base_sl_pips.is_finite() && base_sl_pips > 0.0 {
        base_sl_pips
    } else {
        DEFAULT_SL_PIPS
    };

    let sl_pips = round1(sl_base * sl_multiplier);
    let tp_pips = round1(tp_base * tp_multiplier).max(sl_pips);

    Some(RecommendedParams {
        tp_multiplier,
        sl_multiplier,
        tp_pips,
        sl_pips,
        trailing_stop,
        break_even,
        partial_close,
    })
}

/// Pips to one decimal place.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_is_zero() {
        assert_eq!(position_multiplier(Grade::Reject, 0.9, 2.0), 0.0);
    }

    #[test]
    fn session_factor_is_capped() {
        // (2.5 + 0.2) * 1.5 = 4.05 -> clamped to 3.0
        assert_eq!(position_multiplier(Grade::UltraHigh, 1.0, 2.0), 3.0);
        // (1.2 + 0.0) * 1.5
        assert!((position_multiplier(Grade::Acceptable, 0.5, 2.0) - 1.8).abs() < 1e-9);
    }

    #[test]
    fn score_adjustment_within_bounds() {
        // (0.8 - 0.2) * 0.6
        assert!((position_multiplier(Grade::Low, 0.0, 0.6) - 0.36).abs() < 1e-9);
        // (1.6 + 0.06) * 1.0
        assert!((position_multiplier(Grade::Good, 0.65, 1.0) - 1.66).abs() < 1e-9);
    }

    #[test]
    fn non_reject_is_positive() {
        for grade in Grade::ALL.iter().filter(|g| **g != Grade::Reject) {
            let m = position_multiplier(*grade, 0.0, 0.6);
            assert!(m > 0.0 && m <= 3.0, "{} -> {}", grade, m);
        }
    }

    #[test]
    fn recommended_params_table() {
        let p = recommended_params(Grade::UltraHigh, 15.0, 8.0).unwrap();
        assert_eq!(p.tp_pips, 37.5);
        assert_eq!(p.sl_pips, 6.4);
        assert!(p.trailing_stop && p.break_even && p.partial_close);

        let p = recommended_params(Grade::Acceptable, 0.0, -1.0).unwrap();
        assert_eq!(p.tp_pips, 22.5);
        assert_eq!(p.sl_pips, 8.0);
        assert!(!p.trailing_stop);

        assert!(recommended_params(Grade::Reject, 15.0, 8.0).is_none());
    }

    #[test]
    fn recommended_pips_round_to_one_decimal() {
        // 13.37 * 1.8 = 24.066, 7.33 * 1.0 = 7.33
        let p = recommended_params(Grade::Good, 13.37, 7.33).unwrap();
        assert_eq!(p.tp_pips, 24.1);
        assert_eq!(p.sl_pips, 7.3);
    }

    #[test]
    fn tp_never_below_sl() {
        let p = recommended_params(Grade::Low, 5.0, 20.0).unwrap();
        assert_eq!(p.sl_pips, 22.0);
        assert_eq!(p.tp_pips, 22.0);
    }
}
