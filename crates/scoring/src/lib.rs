//! Campaign performance scoring: benchmark-tier metric scores, weighted
//! aggregation into a letter grade, industry-aware grading, rule-based
//! recommendations, and cross-campaign comparison.

pub mod comparison;
pub mod grader;
pub mod recommendations;
pub mod scorer;
pub mod service;

pub use comparison::{
    calculate_momentum, calculate_trend, compare_campaigns, CampaignComparison, Momentum, Trend,
    TrendDirection,
};
pub use grader::{AiGrade, BenchmarkComparison, GradeInput, IndustryGrader};
pub use recommendations::{Level, Priority, Recommendation, RecommendationEngine};
pub use scorer::{Factor, FactorStatus, GradeInfo, PerformanceScorer, ScoreBreakdown};
pub use service::{CampaignScore, CampaignScoringService};
