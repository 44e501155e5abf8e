use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CampaignError, CampaignResult};

// ─── Metrics ────────────────────────────────────────────────────────────

/// The five scored dimensions of campaign performance.
///
/// Declaration order is the fixed metric order used for tie-breaking and
/// for ordering recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Roi,
    Ctr,
    Conversion,
    Efficiency,
    Engagement,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Roi,
        MetricKind::Ctr,
        MetricKind::Conversion,
        MetricKind::Efficiency,
        MetricKind::Engagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Roi => "roi",
            MetricKind::Ctr => "ctr",
            MetricKind::Conversion => "conversion",
            MetricKind::Efficiency => "efficiency",
            MetricKind::Engagement => "engagement",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Roi => "Return on Investment",
            MetricKind::Ctr => "Click-through Rate",
            MetricKind::Conversion => "Conversion Rate",
            MetricKind::Efficiency => "Cost Efficiency",
            MetricKind::Engagement => "Audience Engagement",
        }
    }

    /// Cost per conversion is the only metric where a smaller value is better.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, MetricKind::Efficiency)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-campaign inputs, all expressed as plain numbers.
///
/// Every field is optional: the scorer substitutes defaults for anything the
/// caller leaves out rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricSet {
    /// Return on investment in percent; may be negative.
    pub roi: Option<f64>,
    /// Click-through rate in percent.
    pub ctr: Option<f64>,
    /// Conversions per click in percent.
    pub conversion_rate: Option<f64>,
    /// Spend per conversion in currency units.
    pub cost_per_conversion: Option<f64>,
    /// Engagements per impression in percent.
    pub engagement_rate: Option<f64>,
}

impl MetricSet {
    /// Raw value supplied for a metric, if any.
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Roi => self.roi,
            MetricKind::Ctr => self.ctr,
            MetricKind::Conversion => self.conversion_rate,
            MetricKind::Efficiency => self.cost_per_conversion,
            MetricKind::Engagement => self.engagement_rate,
        }
    }

    /// Derive metrics from raw campaign counters. A zero denominator leaves
    /// the corresponding metric unset.
    pub fn from_counts(counts: &CampaignCounts) -> Self {
        let ratio = |num: f64, den: f64| if den > 0.0 { Some(num / den * 100.0) } else { None };

        Self {
            roi: ratio(counts.revenue - counts.spend, counts.spend),
            ctr: ratio(counts.clicks as f64, counts.impressions as f64),
            conversion_rate: ratio(counts.conversions as f64, counts.clicks as f64),
            cost_per_conversion: if counts.conversions > 0 {
                Some(counts.spend / counts.conversions as f64)
            } else {
                None
            },
            engagement_rate: ratio(counts.engagements as f64, counts.impressions as f64),
        }
    }

    /// Boundary validation for caller-supplied metrics.
    pub fn validate(&self) -> CampaignResult<()> {
        for kind in MetricKind::ALL {
            let Some(value) = self.get(kind) else {
                continue;
            };
            if !value.is_finite() {
                return Err(CampaignError::Validation(format!(
                    "{kind} must be a finite number"
                )));
            }
            match kind {
                MetricKind::Ctr | MetricKind::Conversion | MetricKind::Engagement => {
                    if !(0.0..=100.0).contains(&value) {
                        return Err(CampaignError::Validation(format!(
                            "{kind} must be a percentage between 0 and 100, got {value}"
                        )));
                    }
                }
                MetricKind::Efficiency => {
                    if value < 0.0 {
                        return Err(CampaignError::Validation(format!(
                            "cost per conversion cannot be negative, got {value}"
                        )));
                    }
                }
                MetricKind::Roi => {}
            }
        }
        Ok(())
    }
}

/// Raw counters a campaign accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignCounts {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub engagements: u64,
    pub spend: f64,
    pub revenue: f64,
}

// ─── Grades ─────────────────────────────────────────────────────────────

/// Letter grade shared by the weighted aggregator and the industry grader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Fixed, industry-independent bands of the weighted aggregator.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Grade::APlus
        } else if score >= 75.0 {
            Grade::A
        } else if score >= 65.0 {
            Grade::B
        } else if score >= 50.0 {
            Grade::C
        } else if score >= 35.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "Excellent",
            Grade::A => "Very Good",
            Grade::B => "Good",
            Grade::C => "Average",
            Grade::D => "Below Average",
            Grade::F => "Poor",
        }
    }

    /// Display color used by dashboards.
    pub fn color(&self) -> &'static str {
        match self {
            Grade::APlus => "#059669",
            Grade::A => "#0ea5e9",
            Grade::B => "#f59e0b",
            Grade::C => "#f97316",
            Grade::D => "#dc2626",
            Grade::F => "#991b1b",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Campaigns ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    #[default]
    Active,
    Paused,
    Completed,
}

/// A campaign as held by the caller's repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub metrics: MetricSet,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, metrics: MetricSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: CampaignStatus::Active,
            industry: None,
            metrics,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_score(85.0), Grade::APlus);
        assert_eq!(Grade::from_score(84.0), Grade::A);
        assert_eq!(Grade::from_score(75.0), Grade::A);
        assert_eq!(Grade::from_score(74.0), Grade::B);
        assert_eq!(Grade::from_score(65.0), Grade::B);
        assert_eq!(Grade::from_score(64.0), Grade::C);
        assert_eq!(Grade::from_score(50.0), Grade::C);
        assert_eq!(Grade::from_score(49.0), Grade::D);
        assert_eq!(Grade::from_score(35.0), Grade::D);
        assert_eq!(Grade::from_score(34.0), Grade::F);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        let g: Grade = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(g, Grade::D);
    }

    #[test]
    fn test_metrics_from_counts() {
        let counts = CampaignCounts {
            impressions: 10_000,
            clicks: 300,
            conversions: 15,
            engagements: 400,
            spend: 450.0,
            revenue: 900.0,
        };
        let m = MetricSet::from_counts(&counts);
        assert!((m.roi.unwrap() - 100.0).abs() < 1e-9);
        assert!((m.ctr.unwrap() - 3.0).abs() < 1e-9);
        assert!((m.conversion_rate.unwrap() - 5.0).abs() < 1e-9);
        assert!((m.cost_per_conversion.unwrap() - 30.0).abs() < 1e-9);
        assert!((m.engagement_rate.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_from_zero_counts_leaves_unset() {
        let m = MetricSet::from_counts(&CampaignCounts::default());
        assert_eq!(m, MetricSet::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_ctr = MetricSet {
            ctr: Some(120.0),
            ..Default::default()
        };
        assert!(bad_ctr.validate().is_err());

        let bad_cost = MetricSet {
            cost_per_conversion: Some(-1.0),
            ..Default::default()
        };
        assert!(bad_cost.validate().is_err());

        let nan = MetricSet {
            roi: Some(f64::NAN),
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let ok = MetricSet {
            roi: Some(-40.0),
            ctr: Some(2.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_metric_set_camel_case_json() {
        let m: MetricSet =
            serde_json::from_str(r#"{"roi": 12.5, "conversionRate": 2.0}"#).unwrap();
        assert_eq!(m.roi, Some(12.5));
        assert_eq!(m.conversion_rate, Some(2.0));
        assert_eq!(m.ctr, None);
    }
}
