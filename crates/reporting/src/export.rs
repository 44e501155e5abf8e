use campaign_core::error::CampaignResult;
use serde_json::Value;
use std::fmt::Write;

use crate::assembler::Report;
use crate::format::escape_html;
use crate::sections::Section;

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 40px; }\n\
.header { border-bottom: 2px solid #f59e0b; padding-bottom: 20px; margin-bottom: 30px; }\n\
.section { margin-bottom: 30px; }\n\
.kpi { display: inline-block; margin: 10px; padding: 15px; background: #f8fafc; border-radius: 8px; }\n\
pre { background: #f3f4f6; padding: 12px; border-radius: 8px; white-space: pre-wrap; }";

pub fn export_json(report: &Report) -> CampaignResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// A self-contained HTML page: header, one block per section in template
/// order, KPI sections rendered as tiles.
pub fn export_html(report: &Report) -> String {
    let mut html = String::new();
    let title = escape_html(&report.title);
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
         <div class=\"header\">\n<h1>{title}</h1>\n<p>Generated: {}</p>\n<p>Date Range: {}</p>\n<p>Performance Grade: {}</p>\n</div>\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        escape_html(&report.date_range),
        report.summary.performance_grade,
    );

    for (name, section) in report.ordered_sections() {
        let _ = write!(
            html,
            "<div class=\"section\">\n<h2>{}</h2>\n",
            escape_html(&heading(name))
        );
        render_section(&mut html, section);
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn heading(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

fn render_section(html: &mut String, section: &Section) {
    let kpis = (section.kind == "kpis")
        .then(|| section.content.get("kpis").and_then(Value::as_array))
        .flatten();

    match kpis {
        Some(kpis) => {
            for kpi in kpis {
                let field = |key: &str| escape_html(kpi.get(key).and_then(Value::as_str).unwrap_or(""));
                let _ = writeln!(
                    html,
                    "<div class=\"kpi\"><strong>{}</strong><br>{} ({})</div>",
                    field("name"),
                    field("value"),
                    field("change"),
                );
            }
        }
        None => {
            let body = serde_json::to_string_pretty(&section.content).unwrap_or_default();
            let _ = writeln!(html, "<pre>{}</pre>", escape_html(&body));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{ReportAssembler, ReportOptions};
    use crate::data::{CampaignRow, ReportData};
    use campaign_core::config::InsightsConfig;

    fn report(template: &str) -> Report {
        let mut row = CampaignRow::new("<Launch> & Learn");
        row.impressions = 10_000;
        row.clicks = 300;
        row.conversions = 12;
        row.spend = 400.0;
        row.revenue = 900.0;
        let data = ReportData {
            campaigns: vec![row],
            ..Default::default()
        };
        ReportAssembler::new(&InsightsConfig::default())
            .assemble(template, &data, &ReportOptions::default())
            .unwrap()
    }

    #[test]
    fn test_export_json_round_trips() {
        let report = report("roi");
        let json = export_json(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.metadata.section_order, report.metadata.section_order);
        assert!(json.contains("\"generatedAt\""));
    }

    #[test]
    fn test_export_html_structure() {
        let html = export_html(&report("executive"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Executive Summary</title>"));
        assert!(html.contains("<h2>ROI ANALYSIS</h2>"));
        assert_eq!(html.matches("class=\"kpi\"").count(), 4);
        assert!(html.contains("Total Clicks"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_export_html_escapes_content() {
        let html = export_html(&report("executive"));
        assert!(!html.contains("<Launch>"));
        assert!(html.contains("&lt;Launch&gt; &amp; Learn"));
    }

    #[test]
    fn test_sections_in_template_order() {
        let html = export_html(&report("daily"));
        let yesterday = html.find("YESTERDAY SUMMARY").unwrap();
        let alerts = html.find("<h2>ALERTS</h2>").unwrap();
        assert!(yesterday < alerts);
    }
}
