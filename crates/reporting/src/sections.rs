//! Section generators. Every section is derived from the report data; none
//! of them invent figures.

use campaign_core::types::CampaignStatus;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::{CampaignRow, DailyPoint};
use crate::format::{currency, pct_change, percent, ratio_percent, round1, signed_percent, thousands};
use crate::summary::{trend_direction, TrendDirection};
use crate::templates::ReportContext;

/// ROI above which a campaign earns more budget.
const SCALE_UP_ROI: f64 = 150.0;
/// ROI below which a campaign is flagged for review.
const REVIEW_ROI: f64 = 80.0;
/// Day-over-day click drop that raises a warning, in percent.
const CLICK_DROP_ALERT: f64 = -15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Value,
}

impl Section {
    fn new(kind: &str, content: Value) -> Self {
        Self {
            kind: kind.to_string(),
            content,
        }
    }
}

// ─── Executive ──────────────────────────────────────────────────────────────

pub fn overview(ctx: &ReportContext<'_>) -> Section {
    let data = ctx.data;
    let active = data
        .campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count();
    let overall_trend = match trend_direction(&data.daily) {
        TrendDirection::Up => "Conversions are growing over the period",
        TrendDirection::Down => "Conversions are declining over the period",
        TrendDirection::Flat => "Conversions are flat over the period",
    };

    Section::new(
        "overview",
        json!({
            "period": ctx.date_range,
            "totalCampaigns": data.campaigns.len(),
            "activeCampaigns": active,
            "topPerformer": data.top_campaign().map_or("N/A", |c| c.name.as_str()),
            "overallTrend": overall_trend,
        }),
    )
}

/// Period-over-period change: second half of the daily series against the
/// first half.
fn half_change(daily: &[DailyPoint], metric: impl Fn(&DailyPoint) -> f64) -> Option<f64> {
    if daily.len() < 2 {
        return None;
    }
    let mid = daily.len() / 2;
    let first: f64 = daily[..mid].iter().map(&metric).sum();
    let second: f64 = daily[daily.len() - mid..].iter().map(&metric).sum();
    pct_change(first, second)
}

fn trend_word(change: Option<f64>) -> &'static str {
    match change {
        Some(c) if c > 0.0 => "up",
        Some(c) if c < 0.0 => "down",
        _ => "flat",
    }
}

pub fn kpis(ctx: &ReportContext<'_>) -> Section {
    let totals = crate::summary::totals(ctx.data);
    let daily = &ctx.data.daily;

    let rows = [
        (
            "Total Clicks",
            thousands(totals.total_clicks),
            half_change(daily, |d| d.clicks as f64),
        ),
        (
            "Conversions",
            thousands(totals.total_conversions),
            half_change(daily, |d| d.conversions as f64),
        ),
        (
            "Revenue",
            currency(totals.total_revenue),
            half_change(daily, |d| d.revenue),
        ),
        ("ROI", percent(totals.avg_roi), half_change(daily, |d| d.roi().unwrap_or(0.0))),
    ];

    let kpis: Vec<Value> = rows
        .iter()
        .map(|(name, value, change)| {
            json!({
                "name": name,
                "value": value,
                "change": signed_percent(*change),
                "trend": trend_word(*change),
            })
        })
        .collect();

    Section::new("kpis", json!({ "kpis": kpis }))
}

pub fn roi_analysis(ctx: &ReportContext<'_>) -> Section {
    let with_roi: Vec<(&CampaignRow, f64)> = ctx
        .data
        .campaigns
        .iter()
        .filter_map(|c| c.roi().map(|r| (c, r)))
        .collect();

    let average = if with_roi.is_empty() {
        0.0
    } else {
        with_roi.iter().map(|(_, r)| r).sum::<f64>() / with_roi.len() as f64
    };
    let best = with_roi.iter().max_by(|a, b| a.1.total_cmp(&b.1));
    let worst = with_roi.iter().min_by(|a, b| a.1.total_cmp(&b.1));
    let entry = |item: Option<&(&CampaignRow, f64)>| {
        item.map_or(Value::Null, |(c, r)| json!({ "name": c.name, "roi": round1(*r) }))
    };

    Section::new(
        "roi_analysis",
        json!({
            "averageRoi": round1(average),
            "bestCampaign": entry(best),
            "worstCampaign": entry(worst),
            "campaignsAbove100": with_roi.iter().filter(|(_, r)| *r > 100.0).count(),
            "unprofitableCampaigns": with_roi.iter().filter(|(_, r)| *r < 0.0).count(),
            "campaigns": with_roi
                .iter()
                .map(|(c, r)| json!({ "name": c.name, "roi": round1(*r) }))
                .collect::<Vec<_>>(),
        }),
    )
}

pub fn recommendations(ctx: &ReportContext<'_>) -> Section {
    let mut items: Vec<Value> = Vec::new();
    for campaign in &ctx.data.campaigns {
        let breakdown = ctx.scorer.aggregate(&campaign.metric_set());
        for rec in ctx.recommender.recommend(&breakdown, &campaign.name) {
            items.push(json!({
                "campaign": campaign.name,
                "priority": rec.priority,
                "title": rec.title,
                "description": rec.description,
                "impact": rec.impact,
                "effort": rec.effort,
                "expectedImpact": rec.expected_gain,
            }));
        }
    }

    Section::new("recommendations", json!({ "recommendations": items }))
}

// ─── Performance ────────────────────────────────────────────────────────────

pub fn detailed_metrics(ctx: &ReportContext<'_>) -> Section {
    let data = ctx.data;
    let clicks = data.total_clicks() as f64;
    let conversions = data.total_conversions() as f64;
    let spend = data.total_spend();
    let revenue = data.total_revenue();

    let pct = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), percent);
    let money = |num: f64, den: f64| {
        if den > 0.0 {
            currency(num / den)
        } else {
            "n/a".to_string()
        }
    };

    Section::new(
        "detailed_metrics",
        json!({
            "clickThroughRate": pct(ratio_percent(clicks, data.total_impressions() as f64)),
            "conversionRate": pct(ratio_percent(conversions, clicks)),
            "costPerClick": money(spend, clicks),
            "costPerConversion": money(spend, conversions),
            "averageOrderValue": money(revenue, conversions),
            "returnOnAdSpend": if spend > 0.0 { json!(round1(revenue / spend)) } else { Value::Null },
        }),
    )
}

pub fn campaign_breakdown(ctx: &ReportContext<'_>) -> Section {
    let mut campaigns: Vec<&CampaignRow> = ctx.data.campaigns.iter().collect();
    campaigns.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

    let rows: Vec<Value> = campaigns
        .iter()
        .take(ctx.config.top_campaigns)
        .map(|c| {
            let score = ctx.scorer.aggregate(&c.metric_set());
            json!({
                "name": c.name,
                "channel": c.channel_name(),
                "clicks": c.clicks,
                "conversions": c.conversions,
                "revenue": c.revenue,
                "roi": c.roi().map(round1),
                "score": score.overall,
                "grade": score.grade.grade,
            })
        })
        .collect();

    Section::new(
        "campaign_breakdown",
        json!({ "campaigns": rows, "totalCampaigns": ctx.data.campaigns.len() }),
    )
}

pub fn trends(ctx: &ReportContext<'_>) -> Section {
    let daily = &ctx.data.daily;
    let best = daily.iter().max_by_key(|d| d.conversions);
    let worst = daily.iter().min_by_key(|d| d.conversions);
    let avg_conversions = if daily.is_empty() {
        0.0
    } else {
        daily.iter().map(|d| d.conversions as f64).sum::<f64>() / daily.len() as f64
    };

    Section::new(
        "trends",
        json!({
            "direction": trend_direction(daily),
            "days": daily.len(),
            "bestDay": best.map(|d| json!({ "date": d.date, "conversions": d.conversions })),
            "worstDay": worst.map(|d| json!({ "date": d.date, "conversions": d.conversions })),
            "averageDailyConversions": round1(avg_conversions),
            "clickChange": signed_percent(half_change(daily, |d| d.clicks as f64)),
            "conversionChange": signed_percent(half_change(daily, |d| d.conversions as f64)),
        }),
    )
}

pub fn optimization_tips(ctx: &ReportContext<'_>) -> Section {
    let tips: Vec<Value> = ctx
        .data
        .campaigns
        .iter()
        .filter_map(|c| {
            let score = ctx.scorer.aggregate(&c.metric_set());
            // Factors are sorted by impact, so the first weak one matters most.
            let weakest = score.factors.iter().find(|f| f.score < 60)?;
            Some(json!({
                "campaign": c.name,
                "focus": weakest.name,
                "score": weakest.score,
                "tip": format!("Improve {} for {} (currently {}/100)", weakest.name.to_lowercase(), c.name, weakest.score),
            }))
        })
        .collect();

    Section::new("optimization_tips", json!({ "tips": tips }))
}

// ─── ROI ────────────────────────────────────────────────────────────────────

pub fn revenue_breakdown(ctx: &ReportContext<'_>) -> Section {
    let total = ctx.data.total_revenue();
    let rows: Vec<Value> = ctx
        .data
        .campaigns
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "revenue": c.revenue,
                "share": ratio_percent(c.revenue, total).map_or(0.0, round1),
            })
        })
        .collect();

    Section::new(
        "revenue_breakdown",
        json!({ "totalRevenue": total, "campaigns": rows }),
    )
}

pub fn cost_analysis(ctx: &ReportContext<'_>) -> Section {
    let total = ctx.data.total_spend();
    let rows: Vec<Value> = ctx
        .data
        .campaigns
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "spend": c.spend,
                "share": ratio_percent(c.spend, total).map_or(0.0, round1),
                "costPerClick": (c.clicks > 0).then(|| round1(c.spend / c.clicks as f64)),
                "costPerConversion": (c.conversions > 0).then(|| round1(c.spend / c.conversions as f64)),
            })
        })
        .collect();

    Section::new("cost_analysis", json!({ "totalSpend": total, "campaigns": rows }))
}

pub fn profit_margins(ctx: &ReportContext<'_>) -> Section {
    let rows: Vec<Value> = ctx
        .data
        .campaigns
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "profit": c.profit(),
                "margin": ratio_percent(c.profit(), c.revenue).map(round1),
            })
        })
        .collect();
    let total_profit = ctx.data.total_revenue() - ctx.data.total_spend();

    Section::new(
        "profit_margins",
        json!({
            "totalProfit": total_profit,
            "overallMargin": ratio_percent(total_profit, ctx.data.total_revenue()).map(round1),
            "campaigns": rows,
        }),
    )
}

pub fn budget_recommendations(ctx: &ReportContext<'_>) -> Section {
    let rows: Vec<Value> = ctx
        .data
        .campaigns
        .iter()
        .filter_map(|c| {
            let roi = c.roi()?;
            let (action, detail) = if roi > SCALE_UP_ROI {
                ("increase", "Increase budget by 25% while ROI holds")
            } else if roi < REVIEW_ROI {
                ("reduce", "Reduce budget and review targeting")
            } else {
                ("maintain", "Keep the current budget")
            };
            Some(json!({
                "name": c.name,
                "roi": round1(roi),
                "action": action,
                "detail": detail,
            }))
        })
        .collect();

    Section::new("budget_recommendations", json!({ "campaigns": rows }))
}

// ─── Daily ──────────────────────────────────────────────────────────────────

fn last_two(daily: &[DailyPoint]) -> (Option<&DailyPoint>, Option<&DailyPoint>) {
    match daily {
        [.., prev, last] => (Some(last), Some(prev)),
        [last] => (Some(last), None),
        [] => (None, None),
    }
}

pub fn yesterday_summary(ctx: &ReportContext<'_>) -> Section {
    let (last, prev) = last_two(&ctx.data.daily);
    let Some(last) = last else {
        return Section::new("yesterday_summary", json!({ "date": Value::Null }));
    };
    let change = |metric: fn(&DailyPoint) -> f64| {
        signed_percent(prev.and_then(|p| pct_change(metric(p), metric(last))))
    };

    Section::new(
        "yesterday_summary",
        json!({
            "date": last.date,
            "clicks": last.clicks,
            "conversions": last.conversions,
            "revenue": currency(last.revenue),
            "clickChange": change(|d| d.clicks as f64),
            "conversionChange": change(|d| d.conversions as f64),
            "revenueChange": change(|d| d.revenue),
        }),
    )
}

pub fn key_metrics(ctx: &ReportContext<'_>) -> Section {
    let (last, _) = last_two(&ctx.data.daily);
    let metrics = last.map(|d| {
        json!({
            "date": d.date,
            "ctr": ratio_percent(d.clicks as f64, d.impressions as f64).map(round1),
            "conversionRate": ratio_percent(d.conversions as f64, d.clicks as f64).map(round1),
            "roi": d.roi().map(round1),
            "spend": d.spend,
            "revenue": d.revenue,
        })
    });

    Section::new("key_metrics", json!({ "latest": metrics }))
}

pub fn alerts(ctx: &ReportContext<'_>) -> Section {
    let data = ctx.data;
    let mut alerts: Vec<Value> = Vec::new();
    let (last, prev) = last_two(&data.daily);

    if let (Some(last), Some(prev)) = (last, prev) {
        if let Some(change) = pct_change(prev.clicks as f64, last.clicks as f64) {
            if change <= CLICK_DROP_ALERT {
                alerts.push(json!({
                    "type": "warning",
                    "message": format!("Clicks dropped {:.0}% on {}", change.abs(), last.date),
                    "action": "Review ad creatives and targeting",
                }));
            }
        }
    }

    if let Some(last) = last {
        let days = data.daily.len() as f64;
        let average = data.daily.iter().map(|d| d.conversions as f64).sum::<f64>() / days;
        if data.daily.len() > 1 && last.conversions as f64 > average * 1.25 {
            alerts.push(json!({
                "type": "success",
                "message": format!("Conversions on {} beat the daily average by more than 25%", last.date),
                "action": "Consider increasing budget for the campaigns driving it",
            }));
        }
    }

    for campaign in &data.campaigns {
        if campaign.roi().is_some_and(|r| r < 0.0) {
            alerts.push(json!({
                "type": "warning",
                "message": format!("{} is spending more than it earns", campaign.name),
                "action": "Pause or rework the campaign",
            }));
        }
    }

    if data.daily.is_empty() {
        alerts.push(json!({
            "type": "info",
            "message": "No daily data supplied for this period",
            "action": "Check tracking integrations",
        }));
    }

    Section::new("alerts", json!({ "alerts": alerts }))
}
