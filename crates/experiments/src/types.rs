use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::store::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One arm of an A/B test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbVariant {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub visitors: u64,
    #[serde(default)]
    pub conversions: u64,
    /// Conversions per visitor in percent.
    #[serde(default)]
    pub conversion_rate: f64,
    /// Sample-size heuristic in [0, 99].
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub is_control: bool,
}

impl AbVariant {
    /// A zero-traffic variant.
    pub fn new(name: impl Into<String>, is_control: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visitors: 0,
            conversions: 0,
            conversion_rate: 0.0,
            confidence: 0.0,
            is_control,
        }
    }

    pub fn with_traffic(mut self, visitors: u64, conversions: u64) -> Self {
        self.visitors = visitors;
        self.conversions = conversions;
        self.refresh();
        self
    }

    /// Conversions per visitor as a fraction; zero without traffic.
    pub fn rate(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }

    /// Recompute the derived fields from the counts.
    pub fn refresh(&mut self) {
        self.conversion_rate = self.rate() * 100.0;
        self.confidence = crate::significance::variant_confidence(self.visitors);
    }

    pub fn validate(&self) -> CampaignResult<()> {
        if self.conversions > self.visitors {
            return Err(CampaignError::Validation(format!(
                "variant '{}' has {} conversions but only {} visitors",
                self.name, self.conversions, self.visitors
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbTestStatus {
    Running,
    Paused,
    Completed,
}

impl fmt::Display for AbTestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbTestStatus::Running => "running",
            AbTestStatus::Paused => "paused",
            AbTestStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// What the caller should do next with a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbRecommendation {
    /// A variant is below the visitor floor.
    NeedMoreData,
    /// Difference is not significant yet.
    ContinueTesting,
    /// The treatment beats the control.
    ImplementVariant,
    /// The control beats the treatment.
    KeepControl,
}

impl fmt::Display for AbRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbRecommendation::NeedMoreData => "need more data",
            AbRecommendation::ContinueTesting => "continue testing",
            AbRecommendation::ImplementVariant => "implement the winning variant",
            AbRecommendation::KeepControl => "keep the control",
        };
        f.write_str(s)
    }
}

/// Outcome of one control-versus-treatment z-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificanceResult {
    pub is_significant: bool,
    pub p_value: f64,
    /// Percent in [50, 99], or 0 when the sample is too small.
    pub confidence: f64,
    pub z_score: f64,
    pub recommendation: AbRecommendation,
    pub control_id: Uuid,
    pub treatment_id: Uuid,
    /// Relative lift of the treatment over the control in percent.
    pub lift: f64,
    pub winner: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTest {
    pub id: Uuid,
    pub name: String,
    pub variants: Vec<AbVariant>,
    pub status: AbTestStatus,
    /// Configured confidence level in percent. Stored for display; the
    /// significance decision always uses the engine's fixed level.
    pub confidence_level: f64,
    pub statistical_significance: Option<SignificanceResult>,
    pub winner: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AbTest {
    pub fn control(&self) -> Option<&AbVariant> {
        self.variants.iter().find(|v| v.is_control)
    }

    pub fn variant(&self, id: &Uuid) -> Option<&AbVariant> {
        self.variants.iter().find(|v| v.id == *id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == AbTestStatus::Completed
    }
}

impl Entity for AbTest {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_variant_has_no_traffic() {
        let v = AbVariant::new("Control", true);
        assert_eq!(v.visitors, 0);
        assert_eq!(v.rate(), 0.0);
        assert!(v.is_control);
    }

    #[test]
    fn test_with_traffic_derives_fields() {
        let v = AbVariant::new("B", false).with_traffic(400, 20);
        assert!((v.conversion_rate - 5.0).abs() < 1e-9);
        assert!((v.confidence - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_conversions_bound() {
        let mut v = AbVariant::new("B", false);
        v.visitors = 10;
        v.conversions = 11;
        assert!(v.validate().is_err());
        v.conversions = 10;
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_recommendation_text() {
        assert_eq!(AbRecommendation::NeedMoreData.to_string(), "need more data");
        assert_eq!(
            serde_json::to_string(&AbRecommendation::KeepControl).unwrap(),
            "\"keep_control\""
        );
    }
}
