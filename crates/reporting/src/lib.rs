//! Campaign report assembly: template-driven sections and chart data,
//! derived summary KPIs and JSON/HTML export.

pub mod assembler;
pub mod charts;
pub mod data;
pub mod export;
mod format;
pub mod sections;
pub mod summary;
pub mod templates;

pub use assembler::{Report, ReportAssembler, ReportMetadata, ReportOptions};
pub use charts::{Chart, ChartConfig, ChartType};
pub use data::{CampaignRow, DailyPoint, ReportData, SummaryTotals};
pub use export::{export_html, export_json};
pub use sections::Section;
pub use summary::{ReportSummary, TrendDirection};
pub use templates::{ReportContext, ReportTemplate, TemplateRegistry};
