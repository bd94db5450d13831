use tracing::warn;

use crate::models::{ComponentScore, Grade};

const HIGH_QUALITY_SCORE: f64 = 0.8;

/// `(grade, min composite, min high-quality ratio)`, best first.
const GRADE_TABLE: [(Grade, f64, f64); 5] = [
    (Grade::UltraHigh, 0.85, 0.80),
    (Grade::High, 0.75, 0.60),
    (Grade::Good, 0.65, 0.40),
    (Grade::Acceptable, 0.50, 0.0),
    (Grade::Low, 0.35, 0.0),
];

/// Fraction of components scoring at least 0.8; 0 when there are none.
pub fn high_quality_ratio(scores: &[ComponentScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let high = scores.iter().filter(|s| s.value >= HIGH_QUALITY_SCORE).count();
    high as f64 / scores.len() as f64
}

/// First grade whose composite and breadth thresholds are both met.
/// Unusable input grades LOW rather than failing.
pub fn classify(composite: f64, high_quality_ratio: f64) -> Grade {
    if !composite.is_finite() || !high_quality_ratio.is_finite() {
        warn!(
            "Grade: non-finite input (composite {}, ratio {}), defaulting to LOW",
            composite, high_quality_ratio
        );
        return Grade::Low;
    }
    GRADE_TABLE
        .iter()
        .find(|(_, min_score, min_ratio)| composite >= *min_score && high_quality_ratio >= *min_ratio)
        .map(|(grade, _, _)| *grade)
        .unwrap_or(Grade::Reject)
}

/// Raw confidence a grade must reach; better grades are trusted at a lower bar.
pub fn confidence_threshold(grade: Grade) -> f64 {
    match grade {
        Grade::UltraHigh => 0.15,
        Grade::High => 0.20,
        Grade::Good => 0.25,
        Grade::Acceptable => 0.35,
        Grade::Low => 0.50,
        Grade::Reject => 1.00,
    }
}
