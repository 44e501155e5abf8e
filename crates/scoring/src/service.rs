//! Scoring service over a caller-owned campaign repository.

use campaign_core::config::ScoringConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::store::InMemoryRepository;
use campaign_core::types::Campaign;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::comparison::{compare_campaigns, CampaignComparison};
use crate::grader::{AiGrade, GradeInput, IndustryGrader};
use crate::recommendations::{Recommendation, RecommendationEngine};
use crate::scorer::{PerformanceScorer, ScoreBreakdown};

/// Everything the dashboard shows for one campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignScore {
    pub campaign_id: Uuid,
    pub name: String,
    pub score: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_grade: Option<AiGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_recommendation: Option<Recommendation>,
}

pub struct CampaignScoringService {
    campaigns: Arc<InMemoryRepository<Campaign>>,
    scorer: PerformanceScorer,
    grader: IndustryGrader,
    recommender: RecommendationEngine,
}

impl CampaignScoringService {
    pub fn new(campaigns: Arc<InMemoryRepository<Campaign>>, config: &ScoringConfig) -> Self {
        Self {
            campaigns,
            scorer: PerformanceScorer::new(),
            grader: IndustryGrader::new(),
            recommender: RecommendationEngine::new(config),
        }
    }

    pub fn with_grader(mut self, grader: IndustryGrader) -> Self {
        self.grader = grader;
        self
    }

    /// Validate and store a campaign.
    pub fn save_campaign(&self, campaign: Campaign) -> CampaignResult<Uuid> {
        campaign.metrics.validate()?;
        let id = campaign.id;
        self.campaigns.upsert(campaign);
        Ok(id)
    }

    pub fn score_campaign(&self, id: &Uuid) -> CampaignResult<CampaignScore> {
        let campaign = self.campaigns.get(id).ok_or(CampaignError::NotFound {
            kind: "campaign",
            id: *id,
        })?;
        Ok(self.score(&campaign))
    }

    /// Score without touching the repository.
    pub fn score(&self, campaign: &Campaign) -> CampaignScore {
        let score = self.scorer.aggregate(&campaign.metrics);
        let recommendations = self.recommender.recommend(&score, &campaign.name);
        let industry_grade = campaign.industry.as_deref().map(|industry| {
            self.grader
                .grade_against_industry(&GradeInput::from(&campaign.metrics), industry)
        });
        let industry_recommendation = industry_grade
            .as_ref()
            .and_then(|g| self.recommender.recommend_for_grade(g));

        info!(
            campaign_id = %campaign.id,
            overall = score.overall,
            grade = %score.grade.grade,
            "campaign scored"
        );

        CampaignScore {
            campaign_id: campaign.id,
            name: campaign.name.clone(),
            score,
            recommendations,
            industry_grade,
            industry_recommendation,
        }
    }

    /// Rank every stored campaign, ordered by creation time before sorting
    /// so ties are deterministic.
    pub fn rank_all(&self) -> CampaignComparison {
        let mut campaigns = self.campaigns.list();
        campaigns.sort_by_key(|c| c.created_at);
        compare_campaigns(&self.scorer, &campaigns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{Grade, MetricSet};

    fn service() -> CampaignScoringService {
        CampaignScoringService::new(Arc::new(InMemoryRepository::new()), &ScoringConfig::default())
    }

    #[test]
    fn test_save_rejects_invalid_metrics() {
        let svc = service();
        let campaign = Campaign::new(
            "Broken",
            MetricSet {
                ctr: Some(250.0),
                ..Default::default()
            },
        );
        assert!(matches!(
            svc.save_campaign(campaign),
            Err(CampaignError::Validation(_))
        ));
    }

    #[test]
    fn test_score_missing_campaign() {
        let svc = service();
        assert!(matches!(
            svc.score_campaign(&Uuid::new_v4()),
            Err(CampaignError::NotFound { .. })
        ));
    }

    #[test]
    fn test_score_with_industry() {
        let svc = service();
        let mut campaign = Campaign::new(
            "Summer Sale",
            MetricSet {
                roi: Some(150.0),
                ctr: Some(2.69),
                conversion_rate: Some(2.81),
                cost_per_conversion: Some(0.9),
                engagement_rate: Some(4.0),
            },
        );
        campaign.industry = Some("E-commerce".into());
        let id = svc.save_campaign(campaign).unwrap();

        let result = svc.score_campaign(&id).unwrap();
        assert_eq!(result.name, "Summer Sale");
        let grade = result.industry_grade.unwrap();
        assert_eq!(grade.grade, Grade::A);
        assert_eq!(
            result.industry_recommendation.unwrap().title,
            "Scale Budget"
        );
    }

    #[test]
    fn test_score_without_industry_skips_grader() {
        let svc = service();
        let id = svc
            .save_campaign(Campaign::new("Plain", MetricSet::default()))
            .unwrap();
        let result = svc.score_campaign(&id).unwrap();
        assert!(result.industry_grade.is_none());
        assert!(result.industry_recommendation.is_none());
        assert_eq!(result.recommendations.len(), 4);
    }

    #[test]
    fn test_rank_all() {
        let svc = service();
        svc.save_campaign(Campaign::new("Low", MetricSet::default()))
            .unwrap();
        svc.save_campaign(Campaign::new(
            "High",
            MetricSet {
                roi: Some(70.0),
                ctr: Some(5.0),
                ..Default::default()
            },
        ))
        .unwrap();
        let ranking = svc.rank_all();
        assert_eq!(ranking.campaigns[0].name, "High");
        assert_eq!(ranking.summary.total_campaigns, 2);
    }
}
