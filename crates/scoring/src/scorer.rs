//! Benchmark-tier metric scoring and the fixed-weight aggregator.

use campaign_core::benchmarks::TierSet;
use campaign_core::types::{Grade, MetricKind, MetricSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregation weights in whole percent. They sum to exactly 100.
pub const WEIGHTS: [(MetricKind, u32); 5] = [
    (MetricKind::Roi, 30),
    (MetricKind::Ctr, 20),
    (MetricKind::Conversion, 25),
    (MetricKind::Efficiency, 15),
    (MetricKind::Engagement, 10),
];

/// Substituted when cost per conversion is missing or zero.
pub const NEUTRAL_COST_PER_CONVERSION: f64 = 10.0;

/// Score awarded when no tier threshold is met.
const FLOOR_SCORE: u8 = 20;

pub fn weight_percent(kind: MetricKind) -> u32 {
    WEIGHTS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}

/// Grade with its dashboard presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeInfo {
    pub grade: Grade,
    pub label: &'static str,
    pub color: &'static str,
}

impl From<Grade> for GradeInfo {
    fn from(grade: Grade) -> Self {
        Self {
            grade,
            label: grade.label(),
            color: grade.color(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    Strong,
    Moderate,
    Weak,
}

impl FactorStatus {
    fn from_score(score: u8) -> Self {
        if score >= 80 {
            FactorStatus::Strong
        } else if score >= 60 {
            FactorStatus::Moderate
        } else {
            FactorStatus::Weak
        }
    }
}

/// One metric's contribution to the overall score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    pub metric: MetricKind,
    pub name: &'static str,
    pub score: u8,
    /// Weight in percent.
    pub weight: f64,
    pub status: FactorStatus,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Weighted score in [0, 100].
    pub overall: u32,
    pub breakdown: BTreeMap<MetricKind, u8>,
    pub grade: GradeInfo,
    /// Sorted by impact, highest first.
    pub factors: Vec<Factor>,
}

impl ScoreBreakdown {
    pub fn score(&self, kind: MetricKind) -> u8 {
        self.breakdown.get(&kind).copied().unwrap_or(FLOOR_SCORE)
    }
}

/// Maps raw metrics onto 0-100 scores using four-tier benchmarks.
#[derive(Debug, Clone, Default)]
pub struct PerformanceScorer {
    tiers: TierSet,
}

impl PerformanceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tiers(tiers: TierSet) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    /// Score a single metric: 100, 80, 60 or 40 for the first tier met,
    /// walking from `excellent` down, otherwise 20.
    pub fn score_metric(&self, value: f64, kind: MetricKind) -> u8 {
        let ladder = self.tiers.get(kind).ladder();
        let higher_is_better = kind.higher_is_better();
        ladder
            .iter()
            .find(|(threshold, _)| {
                if higher_is_better {
                    value >= *threshold
                } else {
                    value <= *threshold
                }
            })
            .map(|(_, score)| *score)
            .unwrap_or(FLOOR_SCORE)
    }

    /// Combine all five metric scores into the overall score and grade.
    pub fn aggregate(&self, metrics: &MetricSet) -> ScoreBreakdown {
        let breakdown: BTreeMap<MetricKind, u8> = MetricKind::ALL
            .iter()
            .map(|&kind| (kind, self.score_metric(resolve(metrics, kind), kind)))
            .collect();

        let weighted: u32 = WEIGHTS
            .iter()
            .map(|(kind, weight)| u32::from(breakdown[kind]) * weight)
            .sum();
        let overall = ((weighted as f64 / 100.0).round() as u32).min(100);

        ScoreBreakdown {
            overall,
            grade: Grade::from_score(overall as f64).into(),
            factors: factor_analysis(&breakdown),
            breakdown,
        }
    }
}

/// Value used for scoring after applying the missing-value defaults.
fn resolve(metrics: &MetricSet, kind: MetricKind) -> f64 {
    let raw = metrics.get(kind).filter(|v| v.is_finite());
    match kind {
        MetricKind::Efficiency => raw
            .filter(|v| *v != 0.0)
            .unwrap_or(NEUTRAL_COST_PER_CONVERSION),
        _ => raw.unwrap_or(0.0),
    }
}

fn factor_analysis(breakdown: &BTreeMap<MetricKind, u8>) -> Vec<Factor> {
    let mut factors: Vec<Factor> = MetricKind::ALL
        .iter()
        .map(|&kind| {
            let score = breakdown[&kind];
            let weight = f64::from(weight_percent(kind));
            Factor {
                metric: kind,
                name: kind.display_name(),
                score,
                weight,
                status: FactorStatus::from_score(score),
                impact: weight,
            }
        })
        .collect();
    // Stable sort keeps the fixed metric order for equal impact.
    factors.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    factors
}
