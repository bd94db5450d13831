pub mod aggregator;
pub mod components;
pub mod gate;
pub mod grade;

pub use aggregator::{assess, composite_score};
pub use components::{default_scorers, run_scorer, ComponentScorer, ScoringContext};
pub use gate::{evaluate_gate, GateInput, GateOutcome};
