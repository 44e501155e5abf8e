use campaign_core::types::Grade;
use serde::{Deserialize, Serialize};

use crate::data::{DailyPoint, ReportData, SummaryTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_revenue: f64,
    #[serde(rename = "avgROI")]
    pub avg_roi: f64,
    pub key_insights: Vec<String>,
    pub performance_grade: Grade,
    pub trend_direction: TrendDirection,
}

impl ReportSummary {
    pub fn from_data(data: &ReportData) -> Self {
        let totals = totals(data);
        Self {
            total_clicks: totals.total_clicks,
            total_conversions: totals.total_conversions,
            total_revenue: totals.total_revenue,
            avg_roi: totals.avg_roi,
            key_insights: key_insights(data, &totals),
            performance_grade: grade_for_roi(totals.avg_roi),
            trend_direction: trend_direction(&data.daily),
        }
    }
}

/// Supplied totals win; otherwise they are summed from the campaigns and
/// the average ROI is the mean over campaigns with spend.
pub(crate) fn totals(data: &ReportData) -> SummaryTotals {
    if let Some(summary) = data.summary {
        return summary;
    }
    let rois: Vec<f64> = data.campaigns.iter().filter_map(|c| c.roi()).collect();
    let avg_roi = if rois.is_empty() {
        0.0
    } else {
        rois.iter().sum::<f64>() / rois.len() as f64
    };
    SummaryTotals {
        total_clicks: data.total_clicks(),
        total_conversions: data.total_conversions(),
        total_revenue: data.total_revenue(),
        avg_roi,
    }
}

pub(crate) fn grade_for_roi(avg_roi: f64) -> Grade {
    match avg_roi {
        r if r >= 150.0 => Grade::APlus,
        r if r >= 120.0 => Grade::A,
        r if r >= 80.0 => Grade::B,
        r if r >= 50.0 => Grade::C,
        _ => Grade::D,
    }
}

/// Compares the first and last daily conversions.
pub(crate) fn trend_direction(daily: &[DailyPoint]) -> TrendDirection {
    match (daily.first(), daily.last()) {
        (Some(first), Some(last)) if daily.len() > 1 => {
            match last.conversions.cmp(&first.conversions) {
                std::cmp::Ordering::Greater => TrendDirection::Up,
                std::cmp::Ordering::Less => TrendDirection::Down,
                std::cmp::Ordering::Equal => TrendDirection::Flat,
            }
        }
        _ => TrendDirection::Flat,
    }
}

fn key_insights(data: &ReportData, totals: &SummaryTotals) -> Vec<String> {
    let mut insights = Vec::new();
    if totals.avg_roi > 100.0 {
        insights.push("Strong ROI performance across campaigns".to_string());
    }
    if totals.total_conversions > 500 {
        insights.push("High conversion volume indicates effective targeting".to_string());
    }
    if let Some(top) = data.top_campaign() {
        insights.push(format!("{} is the top performing campaign", top.name));
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CampaignRow;
    use chrono::NaiveDate;

    fn day(d: u32, conversions: u64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
            impressions: 0,
            clicks: 0,
            conversions,
            spend: 0.0,
            revenue: 0.0,
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade_for_roi(150.0), Grade::APlus);
        assert_eq!(grade_for_roi(149.9), Grade::A);
        assert_eq!(grade_for_roi(120.0), Grade::A);
        assert_eq!(grade_for_roi(80.0), Grade::B);
        assert_eq!(grade_for_roi(50.0), Grade::C);
        assert_eq!(grade_for_roi(49.9), Grade::D);
        assert_eq!(grade_for_roi(-20.0), Grade::D);
    }

    #[test]
    fn test_supplied_totals_win() {
        let data = ReportData {
            summary: Some(SummaryTotals {
                total_clicks: 15420,
                total_conversions: 892,
                total_revenue: 45000.0,
                avg_roi: 125.0,
            }),
            campaigns: vec![CampaignRow::new("Summer Sale")],
            daily: Vec::new(),
        };
        let summary = ReportSummary::from_data(&data);
        assert_eq!(summary.total_clicks, 15420);
        assert_eq!(summary.performance_grade, Grade::A);
        assert_eq!(
            summary.key_insights,
            vec![
                "Strong ROI performance across campaigns".to_string(),
                "High conversion volume indicates effective targeting".to_string(),
                "Summer Sale is the top performing campaign".to_string(),
            ]
        );
    }

    #[test]
    fn test_computed_totals() {
        let mut a = CampaignRow::new("A");
        a.clicks = 100;
        a.spend = 100.0;
        a.revenue = 300.0;
        let mut b = CampaignRow::new("B");
        b.clicks = 50;
        b.spend = 100.0;
        b.revenue = 100.0;
        let c = CampaignRow::new("No spend");
        let data = ReportData {
            campaigns: vec![a, b, c],
            ..Default::default()
        };
        let totals = totals(&data);
        assert_eq!(totals.total_clicks, 150);
        assert!((totals.avg_roi - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(trend_direction(&[]), TrendDirection::Flat);
        assert_eq!(trend_direction(&[day(1, 9)]), TrendDirection::Flat);
        assert_eq!(trend_direction(&[day(1, 5), day(2, 1), day(3, 9)]), TrendDirection::Up);
        assert_eq!(trend_direction(&[day(1, 9), day(2, 3)]), TrendDirection::Down);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = ReportSummary::from_data(&ReportData::default());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["avgROI"], 0.0);
        assert_eq!(value["performanceGrade"], "D");
        assert_eq!(value["trendDirection"], "flat");
        assert!(value["keyInsights"].as_array().unwrap().is_empty());
    }
}
