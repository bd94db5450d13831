use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::Grade;

const GRADES: usize = Grade::ALL.len();

/// Process-wide evaluation counters. Lock-free so concurrent evaluations
/// never lose an increment.
#[derive(Debug, Default)]
pub struct PipelineStatistics {
    total: AtomicU64,
    approved: AtomicU64,
    rejected: AtomicU64,
    per_grade: [AtomicU64; GRADES],
    outcomes: [AtomicU64; GRADES],
    wins: [AtomicU64; GRADES],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeOutcome {
    pub trades: u64,
    pub wins: u64,
    pub win_rate: f64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub approval_rate: f64,
    pub per_grade_counts: BTreeMap<String, u64>,
    pub outcomes: BTreeMap<String, GradeOutcome>,
}

impl PipelineStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, grade: Grade, approved: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if approved {
            self.approved.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
        self.per_grade[grade.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Feed back the result of a trade taken at `grade`.
    pub fn record_outcome(&self, grade: Grade, won: bool) {
        self.outcomes[grade.index()].fetch_add(1, Ordering::Relaxed);
        if won {
            self.wins[grade.index()].fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        let total = self.total();
        let approved = self.approved.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let decided = approved + rejected;

        let per_grade_counts = Grade::ALL
            .iter()
            .map(|g| (g.as_str().to_string(), self.per_grade[g.index()].load(Ordering::Relaxed)))
            .collect();

        let outcomes = Grade::ALL
            .iter()
            .filter_map(|g| {
                let trades = self.outcomes[g.index()].load(Ordering::Relaxed);
                if trades == 0 {
                    return None;
                }
                let wins = self.wins[g.index()].load(Ordering::Relaxed);
                Some((
                    g.as_str().to_string(),
                    GradeOutcome {
                        trades,
                        wins,
                        win_rate: wins as f64 / trades as f64,
                    },
                ))
            })
            .collect();

        StatisticsSnapshot {
            total,
            approved,
            rejected,
            approval_rate: if decided > 0 {
                approved as f64 / decided as f64
            } else {
                0.0
            },
            per_grade_counts,
            outcomes,
        }
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.approved.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        for counter in self.per_grade.iter().chain(&self.outcomes).chain(&self.wins) {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
