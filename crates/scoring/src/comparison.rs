//! Cross-campaign ranking and score trend analysis.

use campaign_core::types::Campaign;
use serde::Serialize;
use uuid::Uuid;

use crate::scorer::{PerformanceScorer, ScoreBreakdown};

/// Campaigns scoring below this are flagged for attention.
const ATTENTION_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCampaign {
    pub id: Uuid,
    pub name: String,
    pub performance_score: ScoreBreakdown,
    /// 1-based position after sorting by overall score.
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_campaigns: usize,
    pub average_score: f64,
    pub top_performer: Option<RankedCampaign>,
    pub needs_attention: Vec<RankedCampaign>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignComparison {
    pub campaigns: Vec<RankedCampaign>,
    pub summary: ComparisonSummary,
}

/// Score and rank campaigns, best first. Equal scores keep input order.
pub fn compare_campaigns(scorer: &PerformanceScorer, campaigns: &[Campaign]) -> CampaignComparison {
    let mut ranked: Vec<RankedCampaign> = campaigns
        .iter()
        .map(|c| RankedCampaign {
            id: c.id,
            name: c.name.clone(),
            performance_score: scorer.aggregate(&c.metrics),
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.performance_score.overall.cmp(&a.performance_score.overall));
    for (i, campaign) in ranked.iter_mut().enumerate() {
        campaign.rank = i + 1;
    }

    let average_score = if ranked.is_empty() {
        0.0
    } else {
        ranked
            .iter()
            .map(|c| f64::from(c.performance_score.overall))
            .sum::<f64>()
            / ranked.len() as f64
    };

    let summary = ComparisonSummary {
        total_campaigns: ranked.len(),
        average_score,
        top_performer: ranked.first().cloned(),
        needs_attention: ranked
            .iter()
            .filter(|c| c.performance_score.overall < ATTENTION_THRESHOLD)
            .cloned()
            .collect(),
    };

    CampaignComparison {
        campaigns: ranked,
        summary,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Accelerating,
    Decelerating,
    Stable,
    Volatile,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub trend: TrendDirection,
    pub change: i64,
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<Momentum>,
}

/// Compare the current score against the most recent historical one.
pub fn calculate_trend(current: f64, history: &[f64]) -> Trend {
    let Some(&previous) = history.last().filter(|_| history.len() >= 2) else {
        return Trend {
            trend: TrendDirection::Stable,
            change: 0,
            percent_change: 0.0,
            momentum: None,
        };
    };

    let change = current - previous;
    let percent_change = if previous != 0.0 {
        (change / previous * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Trend {
        trend: if change > 2.0 {
            TrendDirection::Improving
        } else if change < -2.0 {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        },
        change: change.round() as i64,
        percent_change,
        momentum: Some(calculate_momentum(history)),
    }
}

/// Shape of the last three scores.
pub fn calculate_momentum(scores: &[f64]) -> Momentum {
    let [a, b, c] = match scores {
        [.., a, b, c] => [*a, *b, *c],
        _ => return Momentum::InsufficientData,
    };
    let first = b - a;
    let second = c - b;

    if first > 0.0 && second > 0.0 {
        Momentum::Accelerating
    } else if first < 0.0 && second < 0.0 {
        Momentum::Decelerating
    } else if first.abs() < 1.0 && second.abs() < 1.0 {
        Momentum::Stable
    } else {
        Momentum::Volatile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::MetricSet;

    fn campaign(name: &str, roi: f64) -> Campaign {
        Campaign::new(
            name,
            MetricSet {
                roi: Some(roi),
                ctr: Some(3.0),
                conversion_rate: Some(2.5),
                cost_per_conversion: Some(0.8),
                engagement_rate: Some(3.5),
            },
        )
    }

    #[test]
    fn test_compare_ranks_best_first() {
        let campaigns = vec![
            campaign("Re-engagement", -20.0),
            campaign("Abandoned Cart", 80.0),
            campaign("Welcome Series", 20.0),
        ];
        let result = compare_campaigns(&PerformanceScorer::new(), &campaigns);
        let names: Vec<&str> = result.campaigns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Abandoned Cart", "Welcome Series", "Re-engagement"]);
        assert_eq!(result.campaigns[0].rank, 1);
        assert_eq!(result.campaigns[2].rank, 3);
        assert_eq!(result.summary.total_campaigns, 3);
        assert_eq!(result.summary.top_performer.as_ref().unwrap().name, "Abandoned Cart");
    }

    #[test]
    fn test_compare_flags_low_scores() {
        let campaigns = vec![
            Campaign::new("Empty", MetricSet::default()),
            campaign("Solid", 40.0),
        ];
        let result = compare_campaigns(&PerformanceScorer::new(), &campaigns);
        assert_eq!(result.summary.needs_attention.len(), 1);
        assert_eq!(result.summary.needs_attention[0].name, "Empty");
    }

    #[test]
    fn test_compare_empty() {
        let result = compare_campaigns(&PerformanceScorer::new(), &[]);
        assert_eq!(result.summary.total_campaigns, 0);
        assert_eq!(result.summary.average_score, 0.0);
        assert!(result.summary.top_performer.is_none());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let campaigns = vec![campaign("First", 80.0), campaign("Second", 80.0)];
        let result = compare_campaigns(&PerformanceScorer::new(), &campaigns);
        assert_eq!(result.campaigns[0].name, "First");
        assert_eq!(result.campaigns[1].name, "Second");
    }

    #[test]
    fn test_trend_needs_two_points() {
        let trend = calculate_trend(70.0, &[65.0]);
        assert_eq!(trend.trend, TrendDirection::Stable);
        assert_eq!(trend.change, 0);
        assert!(trend.momentum.is_none());
    }

    #[test]
    fn test_trend_improving() {
        let trend = calculate_trend(72.0, &[60.0, 62.0, 66.0]);
        assert_eq!(trend.trend, TrendDirection::Improving);
        assert_eq!(trend.change, 6);
        assert_eq!(trend.percent_change, 9.1);
        assert_eq!(trend.momentum, Some(Momentum::Accelerating));
    }

    #[test]
    fn test_trend_declining_and_stable() {
        assert_eq!(calculate_trend(50.0, &[60.0, 58.0]).trend, TrendDirection::Declining);
        assert_eq!(calculate_trend(59.0, &[60.0, 60.0]).trend, TrendDirection::Stable);
    }

    #[test]
    fn test_trend_zero_previous() {
        let trend = calculate_trend(10.0, &[5.0, 0.0]);
        assert_eq!(trend.percent_change, 0.0);
    }

    #[test]
    fn test_momentum_shapes() {
        assert_eq!(calculate_momentum(&[1.0, 2.0]), Momentum::InsufficientData);
        assert_eq!(calculate_momentum(&[9.0, 5.0, 3.0]), Momentum::Decelerating);
        assert_eq!(calculate_momentum(&[5.0, 5.5, 5.2]), Momentum::Stable);
        assert_eq!(calculate_momentum(&[5.0, 9.0, 4.0]), Momentum::Volatile);
        assert_eq!(calculate_momentum(&[0.0, 5.0, 9.0, 20.0]), Momentum::Accelerating);
    }
}
