use crate::core::volatility::RegimeAdjustment;
use crate::models::{Grade, SessionInfo};
use crate::quality::grade::confidence_threshold;

#[derive(Debug, Clone, Copy)]
pub struct GateInput {
    pub grade: Grade,
    pub composite_score: f64,
    pub confidence: f64,
    pub base_confidence: f64,
    pub session: SessionInfo,
    pub adjustment: RegimeAdjustment,
    pub min_composite_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub should_trade: bool,
    pub final_threshold: f64,
    pub reasons: Vec<String>,
}

/// The effective confidence bar: the easier of the session-relaxed symbol
/// threshold and the grade threshold, shifted by the volatility regime.
pub fn final_threshold(
    grade: Grade,
    base_confidence: f64,
    session_multiplier: f64,
    adjustment: &RegimeAdjustment,
) -> f64 {
    let session_threshold = if session_multiplier > 0.0 {
        base_confidence / session_multiplier
    } else {
        base_confidence
    };
    let threshold = session_threshold.min(confidence_threshold(grade)) - adjustment.threshold_reduction;
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn verdict(pass: bool) -> &'static str {
    if pass {
        "pass"
    } else {
        "fail"
    }
}

/// Trade only if the grade is not REJECT, the raw confidence clears the
/// final threshold and the composite clears the floor. Every condition and
/// its margin is reported.
pub fn evaluate_gate(input: &GateInput) -> GateOutcome {
    let threshold = final_threshold(
        input.grade,
        input.base_confidence,
        input.session.multiplier,
        &input.adjustment,
    );

    let grade_ok = input.grade != Grade::Reject;
    let confidence_ok = input.confidence >= threshold;
    let composite_ok = input.composite_score >= input.min_composite_score;

    let reasons = vec![
        format!("Grade {}: {}", input.grade, verdict(grade_ok)),
        format!(
            "Confidence {:.3} vs threshold {:.3} (margin {:+.3}): {}",
            input.confidence,
            threshold,
            input.confidence - threshold,
            verdict(confidence_ok)
        ),
        format!(
            "Composite {:.3} vs minimum {:.3} (margin {:+.3}): {}",
            input.composite_score,
            input.min_composite_score,
            input.composite_score - input.min_composite_score,
            verdict(composite_ok)
        ),
        format!(
            "Session {} ({:.1}x), regime shift {:+.2}",
            input.session.name, input.session.multiplier, -input.adjustment.threshold_reduction
        ),
    ];

    GateOutcome {
        should_trade: grade_ok && confidence_ok && composite_ok,
        final_threshold: threshold,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::volatility::regime_adjustment;
    use crate::models::{SessionName, VolatilityRegime};

    fn input(grade: Grade, composite: f64, confidence: f64, regime: VolatilityRegime) -> GateInput {
        GateInput {
            grade,
            composite_score: composite,
            confidence,
            base_confidence: 0.30,
            session: SessionInfo {
                name: SessionName::London,
                multiplier: 1.5,
            },
            adjustment: regime_adjustment(regime),
            min_composite_score: 0.4,
        }
    }

    #[test]
    fn threshold_takes_easier_bar() {
        let normal = regime_adjustment(VolatilityRegime::Normal);
        // 0.30 / 1.5 = 0.20 vs ACCEPTABLE 0.35
        assert!((final_threshold(Grade::Acceptable, 0.30, 1.5, &normal) - 0.20).abs() < 1e-9);
        // 0.30 / 0.6 = 0.5 vs ULTRA 0.15
        assert!((final_threshold(Grade::UltraHigh, 0.30, 0.6, &normal) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn regime_shifts_threshold() {
        let low = regime_adjustment(VolatilityRegime::Low);
        let extreme = regime_adjustment(VolatilityRegime::Extreme);
        assert!((final_threshold(Grade::Acceptable, 0.30, 1.5, &low) - 0.15).abs() < 1e-9);
        assert!((final_threshold(Grade::Acceptable, 0.30, 1.5, &extreme) - 0.30).abs() < 1e-9);
        // Never below zero
        assert_eq!(final_threshold(Grade::UltraHigh, 0.01, 2.0, &low), 0.0);
    }

    #[test]
    fn all_three_conditions_required() {
        let ok = evaluate_gate(&input(Grade::Good, 0.66, 0.5, VolatilityRegime::Normal));
        assert!(ok.should_trade);
        assert!(ok.reasons.len() >= 3);

        let reject = evaluate_gate(&input(Grade::Reject, 0.2, 0.99, VolatilityRegime::Normal));
        assert!(!reject.should_trade);
        assert!(reject.reasons[0].contains("fail"));

        let low_conf = evaluate_gate(&input(Grade::Good, 0.66, 0.1, VolatilityRegime::Normal));
        assert!(!low_conf.should_trade);
        assert!(low_conf.reasons[1].contains("fail"));

        let weak = evaluate_gate(&input(Grade::Low, 0.38, 0.9, VolatilityRegime::Normal));
        assert!(!weak.should_trade);
        assert!(weak.reasons[2].contains("fail"));
    }
}
