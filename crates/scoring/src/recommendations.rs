//! Rule-based improvement suggestions.
//!
//! Two independent producers live here: one driven by a weighted score
//! breakdown, one driven by an industry grade. They serve different callers
//! and their outputs are never merged.

use campaign_core::config::ScoringConfig;
use campaign_core::types::{Grade, MetricKind};
use serde::{Deserialize, Serialize};

use crate::grader::AiGrade;
use crate::scorer::ScoreBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl From<Level> for Priority {
    fn from(level: Level) -> Self {
        match level {
            Level::High => Priority::High,
            Level::Medium => Priority::Medium,
            Level::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub impact: Level,
    pub effort: Level,
    pub priority: Priority,
    pub expected_gain: String,
}

impl Recommendation {
    fn new(
        title: &str,
        description: impl Into<String>,
        impact: Level,
        effort: Level,
        priority: Priority,
        expected_gain: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            impact,
            effort,
            priority,
            expected_gain: expected_gain.to_string(),
        }
    }
}

fn metric_template(kind: MetricKind) -> Recommendation {
    let (title, description, impact, effort, gain) = match kind {
        MetricKind::Roi => (
            "Improve ROI Performance",
            "Focus on higher-value conversions and reduce acquisition costs",
            Level::High,
            Level::Medium,
            "+8-12 points",
        ),
        MetricKind::Ctr => (
            "Optimize Click-through Rate",
            "A/B test ad creatives, headlines, and targeting",
            Level::Medium,
            Level::Low,
            "+5-8 points",
        ),
        MetricKind::Conversion => (
            "Enhance Conversion Rate",
            "Optimize landing pages and improve user experience",
            Level::High,
            Level::High,
            "+10-15 points",
        ),
        MetricKind::Efficiency => (
            "Improve Cost Efficiency",
            "Refine targeting and bid strategies to reduce costs",
            Level::Medium,
            Level::Medium,
            "+6-10 points",
        ),
        MetricKind::Engagement => (
            "Boost Audience Engagement",
            "Create more compelling content and interactive elements",
            Level::Low,
            Level::Medium,
            "+3-5 points",
        ),
    };
    Recommendation::new(title, description, impact, effort, impact.into(), gain)
}

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    threshold: u8,
    scale_up_threshold: u32,
    max_recommendations: usize,
}

impl RecommendationEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            threshold: config.recommendation_threshold,
            scale_up_threshold: config.scale_up_threshold,
            max_recommendations: config.max_recommendations,
        }
    }

    /// Suggestions for every metric scoring below the threshold, in the fixed
    /// metric order, followed by a scale-up suggestion for strong campaigns.
    /// The list is truncated, never sampled.
    pub fn recommend(&self, breakdown: &ScoreBreakdown, campaign_name: &str) -> Vec<Recommendation> {
        let mut out: Vec<Recommendation> = MetricKind::ALL
            .iter()
            .filter(|&&kind| breakdown.score(kind) < self.threshold)
            .map(|&kind| metric_template(kind))
            .collect();

        if breakdown.overall >= self.scale_up_threshold {
            out.push(Recommendation::new(
                "Scale High-Performing Campaign",
                format!(
                    "{campaign_name} is performing excellently. Consider increasing budget by 25-50%"
                ),
                Level::High,
                Level::Low,
                Priority::High,
                "Revenue increase",
            ));
        }

        out.truncate(self.max_recommendations);
        out
    }

    /// The single suggestion for an industry grade band. B grades get none.
    pub fn recommend_for_grade(&self, grade: &AiGrade) -> Option<Recommendation> {
        match grade.grade {
            Grade::F | Grade::D => Some(Recommendation::new(
                "Complete Campaign Overhaul",
                "Performance is far below industry benchmarks. Rebuild targeting, creatives and landing pages before spending further",
                Level::High,
                Level::High,
                Priority::Critical,
                "+20-30 points",
            )),
            Grade::C => Some(Recommendation::new(
                "Conversion Optimization",
                "Run landing page and funnel experiments to lift conversion rate toward the industry benchmark",
                Level::High,
                Level::Medium,
                Priority::High,
                "+10-15 points",
            )),
            Grade::A | Grade::APlus => Some(Recommendation::new(
                "Scale Budget",
                "Campaign beats its industry benchmarks. Increase budget by 25-50% while monitoring ROI",
                Level::High,
                Level::Low,
                Priority::Medium,
                "Revenue increase",
            )),
            Grade::B => None,
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
