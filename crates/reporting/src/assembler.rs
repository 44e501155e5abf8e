//! Report assembly: resolve a template, run its generators over the data
//! and attach the summary and metadata.

use campaign_core::config::{InsightsConfig, ReportingConfig};
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_scoring::{PerformanceScorer, RecommendationEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::charts::Chart;
use crate::data::ReportData;
use crate::sections::Section;
use crate::summary::ReportSummary;
use crate::templates::{ReportContext, TemplateRegistry};

// ─── Types ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    /// Falls back to the configured default range.
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub audience: String,
    pub page_count: u32,
    pub data_points: usize,
    /// Template order of the sections; the section map itself is sorted.
    pub section_order: Vec<String>,
    pub chart_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub template: String,
    pub generated_at: DateTime<Utc>,
    pub date_range: String,
    pub sections: BTreeMap<String, Section>,
    pub charts: BTreeMap<String, Chart>,
    pub summary: ReportSummary,
    pub metadata: ReportMetadata,
}

impl Report {
    /// Sections in template order.
    pub fn ordered_sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.metadata
            .section_order
            .iter()
            .filter_map(|name| self.sections.get(name).map(|s| (name.as_str(), s)))
    }
}

/// One cover page, half a page per section and 0.3 of a page per chart,
/// rounded up. Computed in tenths of a page to stay exact.
pub fn page_count(sections: usize, charts: usize) -> u32 {
    let tenths = 10 + 5 * sections + 3 * charts;
    tenths.div_ceil(10) as u32
}

// ─── Assembler ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    registry: TemplateRegistry,
    config: ReportingConfig,
    scorer: PerformanceScorer,
    recommender: RecommendationEngine,
}

impl ReportAssembler {
    pub fn new(config: &InsightsConfig) -> Self {
        Self::with_registry(TemplateRegistry::standard(), config)
    }

    pub fn with_registry(registry: TemplateRegistry, config: &InsightsConfig) -> Self {
        Self {
            registry,
            config: config.reporting.clone(),
            scorer: PerformanceScorer::new(),
            recommender: RecommendationEngine::new(&config.scoring),
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.registry
    }

    pub fn assemble(
        &self,
        template_name: &str,
        data: &ReportData,
        options: &ReportOptions,
    ) -> CampaignResult<Report> {
        let Some(template) = self.registry.get(template_name) else {
            warn!(template = template_name, "unknown report template");
            return Err(CampaignError::UnknownTemplate(template_name.to_string()));
        };

        let date_range = options
            .date_range
            .clone()
            .unwrap_or_else(|| self.config.default_date_range.clone());

        let ctx = ReportContext {
            data,
            date_range: &date_range,
            config: &self.config,
            scorer: &self.scorer,
            recommender: &self.recommender,
        };

        let mut sections = BTreeMap::new();
        for (name, generate) in &template.sections {
            debug!(section = name, "generating section");
            sections.insert(name.to_string(), generate(&ctx));
        }

        let mut charts = BTreeMap::new();
        for (name, generate) in &template.charts {
            debug!(chart = name, "generating chart");
            charts.insert(name.to_string(), generate(&ctx));
        }

        let metadata = ReportMetadata {
            audience: template.audience.clone(),
            page_count: page_count(sections.len(), charts.len()),
            data_points: data.data_points(),
            section_order: template.sections.iter().map(|(n, _)| n.to_string()).collect(),
            chart_order: template.charts.iter().map(|(n, _)| n.to_string()).collect(),
        };

        let report = Report {
            id: Uuid::new_v4(),
            title: template.name.clone(),
            template: template.key.clone(),
            generated_at: Utc::now(),
            date_range,
            sections,
            charts,
            summary: ReportSummary::from_data(data),
            metadata,
        };

        metrics::counter!("reports.generated").increment(1);
        info!(
            report_id = %report.id,
            template = %report.template,
            sections = report.sections.len(),
            charts = report.charts.len(),
            pages = report.metadata.page_count,
            "report assembled"
        );

        Ok(report)
    }
}
