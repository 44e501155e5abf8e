//! Input records the report generators read.

use campaign_core::types::{CampaignStatus, MetricSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pre-aggregated totals. When absent they are computed from the campaigns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryTotals {
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_revenue: f64,
    pub avg_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub name: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub engagements: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
    /// Explicit metrics; derived from the counters when absent.
    #[serde(default)]
    pub metrics: Option<MetricSet>,
}

impl CampaignRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CampaignStatus::Active,
            channel: None,
            impressions: 0,
            clicks: 0,
            conversions: 0,
            engagements: 0,
            spend: 0.0,
            revenue: 0.0,
            metrics: None,
        }
    }

    /// ROI in percent, `None` without spend.
    pub fn roi(&self) -> Option<f64> {
        (self.spend > 0.0).then(|| (self.revenue - self.spend) / self.spend * 100.0)
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.spend
    }

    pub fn channel_name(&self) -> &str {
        self.channel.as_deref().unwrap_or("unassigned")
    }

    pub fn metric_set(&self) -> MetricSet {
        self.metrics.unwrap_or_else(|| {
            MetricSet::from_counts(&campaign_core::types::CampaignCounts {
                impressions: self.impressions,
                clicks: self.clicks,
                conversions: self.conversions,
                engagements: self.engagements,
                spend: self.spend,
                revenue: self.revenue,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
}

impl DailyPoint {
    pub fn roi(&self) -> Option<f64> {
        (self.spend > 0.0).then(|| (self.revenue - self.spend) / self.spend * 100.0)
    }
}

/// Everything a report is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub summary: Option<SummaryTotals>,
    pub campaigns: Vec<CampaignRow>,
    /// Daily points, oldest first.
    pub daily: Vec<DailyPoint>,
}

impl ReportData {
    pub fn total_clicks(&self) -> u64 {
        self.campaigns.iter().map(|c| c.clicks).sum()
    }

    pub fn total_impressions(&self) -> u64 {
        self.campaigns.iter().map(|c| c.impressions).sum()
    }

    pub fn total_conversions(&self) -> u64 {
        self.campaigns.iter().map(|c| c.conversions).sum()
    }

    pub fn total_spend(&self) -> f64 {
        self.campaigns.iter().map(|c| c.spend).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.campaigns.iter().map(|c| c.revenue).sum()
    }

    /// The campaign with the most conversions; the later one wins ties.
    pub fn top_campaign(&self) -> Option<&CampaignRow> {
        self.campaigns.iter().max_by_key(|c| c.conversions)
    }

    pub fn data_points(&self) -> usize {
        self.campaigns.len() + self.daily.len()
    }
}
