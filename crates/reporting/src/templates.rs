//! Report template registry. Each template names its sections and charts
//! and points at the generator for each; nothing dispatches on strings at
//! assembly time.

use campaign_core::config::ReportingConfig;
use campaign_scoring::{PerformanceScorer, RecommendationEngine};
use std::collections::HashMap;

use crate::charts::{self, Chart};
use crate::data::ReportData;
use crate::sections::{self, Section};

/// Read-only inputs shared by every generator during one assembly.
pub struct ReportContext<'a> {
    pub data: &'a ReportData,
    pub date_range: &'a str,
    pub config: &'a ReportingConfig,
    pub scorer: &'a PerformanceScorer,
    pub recommender: &'a RecommendationEngine,
}

pub type SectionGenerator = fn(&ReportContext<'_>) -> Section;
pub type ChartGenerator = fn(&ReportContext<'_>) -> Chart;

#[derive(Clone)]
pub struct ReportTemplate {
    pub key: String,
    pub name: String,
    pub audience: String,
    pub sections: Vec<(&'static str, SectionGenerator)>,
    pub charts: Vec<(&'static str, ChartGenerator)>,
}

impl ReportTemplate {
    pub fn new(key: &str, name: &str, audience: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            audience: audience.to_string(),
            sections: Vec::new(),
            charts: Vec::new(),
        }
    }

    pub fn section(mut self, name: &'static str, generator: SectionGenerator) -> Self {
        self.sections.push((name, generator));
        self
    }

    pub fn chart(mut self, name: &'static str, generator: ChartGenerator) -> Self {
        self.charts.push((name, generator));
        self
    }
}

impl std::fmt::Debug for ReportTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportTemplate")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("audience", &self.audience)
            .field("sections", &self.sections.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("charts", &self.charts.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, ReportTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the executive, performance, roi and daily templates.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register(
            ReportTemplate::new("executive", "Executive Summary", "executives")
                .section("overview", sections::overview)
                .section("kpis", sections::kpis)
                .section("roi_analysis", sections::roi_analysis)
                .section("recommendations", sections::recommendations)
                .chart("performance_trend", charts::performance_trend)
                .chart("channel_comparison", charts::channel_comparison),
        );
        registry.register(
            ReportTemplate::new("performance", "Performance Deep Dive", "marketing_managers")
                .section("detailed_metrics", sections::detailed_metrics)
                .section("campaign_breakdown", sections::campaign_breakdown)
                .section("trends", sections::trends)
                .section("optimization_tips", sections::optimization_tips)
                .chart("daily_performance", charts::daily_performance)
                .chart("conversion_funnel", charts::conversion_funnel)
                .chart("channel_performance", charts::channel_performance),
        );
        registry.register(
            ReportTemplate::new("roi", "ROI Analysis", "finance_team")
                .section("revenue_breakdown", sections::revenue_breakdown)
                .section("cost_analysis", sections::cost_analysis)
                .section("profit_margins", sections::profit_margins)
                .section("budget_recommendations", sections::budget_recommendations)
                .chart("roi_trend", charts::roi_trend)
                .chart("spend_vs_revenue", charts::spend_vs_revenue)
                .chart("channel_roi", charts::channel_roi),
        );
        registry.register(
            ReportTemplate::new("daily", "Daily Snapshot", "operations_team")
                .section("yesterday_summary", sections::yesterday_summary)
                .section("key_metrics", sections::key_metrics)
                .section("alerts", sections::alerts)
                .chart("daily_trend", charts::daily_trend),
        );

        registry
    }

    /// Add or replace a template under its key.
    pub fn register(&mut self, template: ReportTemplate) {
        self.templates.insert(template.key.clone(), template);
    }

    pub fn get(&self, key: &str) -> Option<&ReportTemplate> {
        self.templates.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
