//! Chart payloads. The renderer lives outside this crate; a chart here is
//! just its kind, the data rows and the axis configuration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::data::CampaignRow;
use crate::format::round1;
use crate::templates::ReportContext;

const PALETTE: [&str; 4] = ["#3b82f6", "#10b981", "#f59e0b", "#ef4444"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Funnel,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub x_axis: String,
    pub y_axis: Vec<String>,
    pub colors: Vec<String>,
}

impl ChartConfig {
    fn new(x_axis: &str, y_axis: &[&str], colors: &[&str]) -> Self {
        Self {
            x_axis: x_axis.to_string(),
            y_axis: y_axis.iter().map(|s| s.to_string()).collect(),
            colors: colors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: Value,
    pub config: ChartConfig,
}

impl Chart {
    fn new(chart_type: ChartType, data: Vec<Value>, config: ChartConfig) -> Self {
        Self {
            chart_type,
            data: Value::Array(data),
            config,
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.data.as_array().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct ChannelTotals {
    impressions: u64,
    clicks: u64,
    conversions: u64,
    spend: f64,
    revenue: f64,
}

fn by_channel(campaigns: &[CampaignRow]) -> BTreeMap<&str, ChannelTotals> {
    let mut channels: BTreeMap<&str, ChannelTotals> = BTreeMap::new();
    for c in campaigns {
        let entry = channels.entry(c.channel_name()).or_default();
        entry.impressions += c.impressions;
        entry.clicks += c.clicks;
        entry.conversions += c.conversions;
        entry.spend += c.spend;
        entry.revenue += c.revenue;
    }
    channels
}

fn roi(spend: f64, revenue: f64) -> Option<f64> {
    (spend > 0.0).then(|| round1((revenue - spend) / spend * 100.0))
}

pub fn performance_trend(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .daily
        .iter()
        .map(|d| json!({ "date": d.date, "clicks": d.clicks, "conversions": d.conversions }))
        .collect();
    Chart::new(
        ChartType::Line,
        rows,
        ChartConfig::new("date", &["clicks", "conversions"], &["#f59e0b", "#059669"]),
    )
}

pub fn channel_comparison(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .campaigns
        .iter()
        .map(|c| json!({ "name": c.name, "revenue": c.revenue }))
        .collect();
    Chart::new(ChartType::Bar, rows, ChartConfig::new("name", &["revenue"], &PALETTE))
}

pub fn daily_performance(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .daily
        .iter()
        .map(|d| {
            json!({
                "date": d.date,
                "impressions": d.impressions,
                "clicks": d.clicks,
                "conversions": d.conversions,
            })
        })
        .collect();
    Chart::new(
        ChartType::Area,
        rows,
        ChartConfig::new(
            "date",
            &["impressions", "clicks", "conversions"],
            &["#94a3b8", "#f59e0b", "#059669"],
        ),
    )
}

pub fn conversion_funnel(ctx: &ReportContext<'_>) -> Chart {
    let data = ctx.data;
    let stages = [
        ("Impressions", data.total_impressions()),
        ("Clicks", data.total_clicks()),
        ("Conversions", data.total_conversions()),
    ];
    let mut previous: Option<u64> = None;
    let rows = stages
        .iter()
        .map(|&(stage, count)| {
            let rate = previous
                .filter(|&p| p > 0)
                .map(|p| round1(count as f64 / p as f64 * 100.0));
            previous = Some(count);
            json!({ "stage": stage, "count": count, "rate": rate })
        })
        .collect();
    Chart::new(
        ChartType::Funnel,
        rows,
        ChartConfig::new("stage", &["count"], &["#3b82f6", "#f59e0b", "#059669"]),
    )
}

pub fn channel_performance(ctx: &ReportContext<'_>) -> Chart {
    let rows = by_channel(&ctx.data.campaigns)
        .into_iter()
        .map(|(channel, t)| {
            json!({
                "channel": channel,
                "clicks": t.clicks,
                "conversions": t.conversions,
                "ctr": (t.impressions > 0).then(|| round1(t.clicks as f64 / t.impressions as f64 * 100.0)),
            })
        })
        .collect();
    Chart::new(
        ChartType::Bar,
        rows,
        ChartConfig::new("channel", &["clicks", "conversions"], &PALETTE),
    )
}

pub fn roi_trend(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .daily
        .iter()
        .map(|d| json!({ "date": d.date, "roi": d.roi().map(round1) }))
        .collect();
    Chart::new(ChartType::Line, rows, ChartConfig::new("date", &["roi"], &["#7c3aed"]))
}

pub fn spend_vs_revenue(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .campaigns
        .iter()
        .map(|c| json!({ "name": c.name, "spend": c.spend, "revenue": c.revenue }))
        .collect();
    Chart::new(
        ChartType::Bar,
        rows,
        ChartConfig::new("name", &["spend", "revenue"], &["#ef4444", "#10b981"]),
    )
}

pub fn channel_roi(ctx: &ReportContext<'_>) -> Chart {
    let rows = by_channel(&ctx.data.campaigns)
        .into_iter()
        .map(|(channel, t)| json!({ "channel": channel, "roi": roi(t.spend, t.revenue) }))
        .collect();
    Chart::new(ChartType::Bar, rows, ChartConfig::new("channel", &["roi"], &PALETTE))
}

pub fn daily_trend(ctx: &ReportContext<'_>) -> Chart {
    let rows = ctx
        .data
        .daily
        .iter()
        .map(|d| {
            json!({
                "date": d.date,
                "clicks": d.clicks,
                "conversions": d.conversions,
                "revenue": d.revenue,
            })
        })
        .collect();
    Chart::new(
        ChartType::Line,
        rows,
        ChartConfig::new("date", &["clicks", "conversions", "revenue"], &["#f59e0b", "#059669", "#3b82f6"]),
    )
}
