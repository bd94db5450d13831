use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::{ComponentScore, QualityAssessment};
use crate::quality::grade;

const PASS_SCORE: f64 = 0.7;
const BROAD_AGREEMENT: f64 = 0.8;
const AGREEMENT_BONUS: f64 = 0.10;

/// Weighted mean of the component scores, plus a flat bonus when at least
/// 80% of components score 0.7 or better. Returns `(composite, bonus_applied)`.
pub fn composite_score(scores: &[ComponentScore], config: &Config) -> (f64, bool) {
    let (weighted, total_weight) = scores.iter().fold((0.0, 0.0), |(sum, total), s| {
        let w = config.weight_for(&s.name);
        (sum + s.value * w, total + w)
    });
    if scores.is_empty() || total_weight <= 0.0 || !weighted.is_finite() {
        return (0.5, false);
    }

    let mut composite = weighted / total_weight;
    let passed = scores.iter().filter(|s| s.value >= PASS_SCORE).count();
    let bonus = passed as f64 / scores.len() as f64 >= BROAD_AGREEMENT;
    if bonus {
        composite += AGREEMENT_BONUS;
    }
    (composite.clamp(0.0, 1.0), bonus)
}

pub fn assess(scores: &[ComponentScore], config: &Config) -> QualityAssessment {
    let (composite, agreement_bonus) = composite_score(scores, config);
    let high_quality_ratio = grade::high_quality_ratio(scores);
    let component_scores: BTreeMap<String, f64> =
        scores.iter().map(|s| (s.name.clone(), s.value)).collect();

    QualityAssessment {
        composite_score: composite,
        grade: grade::classify(composite, high_quality_ratio),
        component_scores,
        high_quality_ratio,
        agreement_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RISK_REWARD, TECHNICAL_CONFLUENCE};
    use crate::models::Grade;

    fn scores(values: &[(&str, f64)]) -> Vec<ComponentScore> {
        values.iter().map(|(n, v)| ComponentScore::new(n, *v)).collect()
    }

    #[test]
    fn weights_only_count_present_components() {
        let cfg = Config::default();
        // (0.20 * 1.0 + 0.07 * 0.0) / 0.27; only half pass, so no bonus
        let (c, bonus) = composite_score(&scores(&[(TECHNICAL_CONFLUENCE, 1.0), (RISK_REWARD, 0.0)]), &cfg);
        assert!((c - 0.20 / 0.27).abs() < 1e-9);
        assert!(!bonus);
    }

    #[test]
    fn unknown_component_uses_default_weight() {
        let cfg = Config::default();
        let (c, _) = composite_score(&scores(&[(TECHNICAL_CONFLUENCE, 0.0), ("order_flow", 1.0)]), &cfg);
        assert!((c - 0.05 / 0.25).abs() < 1e-9);
    }

    #[test]
    fn broad_agreement_bonus_is_capped() {
        let cfg = Config::default();
        let all_high = scores(&[(TECHNICAL_CONFLUENCE, 0.95), (RISK_REWARD, 1.0)]);
        let (c, bonus) = composite_score(&all_high, &cfg);
        assert!(bonus);
        assert_eq!(c, 1.0);
    }

    #[test]
    fn empty_is_neutral() {
        let cfg = Config::default();
        assert_eq!(composite_score(&[], &cfg), (0.5, false));
    }

    #[test]
    fn assessment_grades_composite() {
        let cfg = Config::default();
        let a = assess(&scores(&[(TECHNICAL_CONFLUENCE, 0.2), (RISK_REWARD, 0.2)]), &cfg);
        assert_eq!(a.grade, Grade::Reject);
        assert_eq!(a.component_scores.len(), 2);
        assert_eq!(a.high_quality_ratio, 0.0);
    }
}
