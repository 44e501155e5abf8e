//! End-to-end report flow: raw campaign rows and daily points through every
//! registered template and both export formats.

#[cfg(test)]
mod tests {
    use campaign_core::config::InsightsConfig;
    use campaign_core::types::Grade;
    use campaign_reporting::*;
    use chrono::NaiveDate;

    fn campaign(name: &str, channel: &str, clicks: u64, conversions: u64, spend: f64, revenue: f64) -> CampaignRow {
        let mut row = CampaignRow::new(name);
        row.channel = Some(channel.to_string());
        row.impressions = clicks * 35;
        row.clicks = clicks;
        row.conversions = conversions;
        row.engagements = clicks / 2;
        row.spend = spend;
        row.revenue = revenue;
        row
    }

    fn sample_data() -> ReportData {
        let daily = (1..=7)
            .map(|d| DailyPoint {
                date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
                impressions: 20_000 + u64::from(d) * 500,
                clicks: 600 + u64::from(d) * 20,
                conversions: 40 + u64::from(d) * 3,
                spend: 1_200.0,
                revenue: 3_000.0 + f64::from(d) * 150.0,
            })
            .collect();

        ReportData {
            summary: None,
            campaigns: vec![
                campaign("Summer Sale", "search", 6_000, 420, 8_000.0, 24_000.0),
                campaign("Retargeting", "display", 2_500, 150, 3_000.0, 6_600.0),
                campaign("Brand Awareness", "social", 4_000, 40, 5_000.0, 3_500.0),
            ],
            daily,
        }
    }

    #[test]
    fn test_every_template_assembles() {
        let assembler = ReportAssembler::new(&InsightsConfig::default());
        let data = sample_data();

        let expected = [
            ("executive", 4, 2, 4),
            ("performance", 4, 3, 4),
            ("roi", 4, 3, 4),
            ("daily", 3, 1, 3),
        ];
        for (name, sections, charts, pages) in expected {
            let report = assembler.assemble(name, &data, &ReportOptions::default()).unwrap();
            assert_eq!(report.sections.len(), sections, "{name}");
            assert_eq!(report.charts.len(), charts, "{name}");
            assert_eq!(report.metadata.page_count, pages, "{name}");
            assert_eq!(report.metadata.data_points, 10, "{name}");
        }
    }

    #[test]
    fn test_summary_derived_from_campaigns() {
        let assembler = ReportAssembler::new(&InsightsConfig::default());
        let report = assembler
            .assemble("executive", &sample_data(), &ReportOptions::default())
            .unwrap();

        let summary = &report.summary;
        assert_eq!(summary.total_clicks, 12_500);
        assert_eq!(summary.total_conversions, 610);
        // (200 + 120 - 30) / 3
        assert!((summary.avg_roi - 96.666_666).abs() < 1e-3);
        assert_eq!(summary.performance_grade, Grade::B);
        assert_eq!(summary.trend_direction, TrendDirection::Up);
        assert!(summary
            .key_insights
            .contains(&"Summer Sale is the top performing campaign".to_string()));
    }

    #[test]
    fn test_unknown_template_fails_fast() {
        let assembler = ReportAssembler::new(&InsightsConfig::default());
        let result = assembler.assemble("monthly", &sample_data(), &ReportOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_template_registration() {
        let mut assembler = ReportAssembler::new(&InsightsConfig::default());
        assembler.registry_mut().register(
            ReportTemplate::new("channels", "Channel Review", "marketing_managers")
                .section("campaign_breakdown", sections::campaign_breakdown)
                .chart("channel_roi", charts::channel_roi),
        );

        let report = assembler
            .assemble("channels", &sample_data(), &ReportOptions::default())
            .unwrap();
        assert_eq!(report.title, "Channel Review");
        let chart = &report.charts["channel_roi"];
        assert_eq!(chart.chart_type, ChartType::Bar);
        assert_eq!(chart.len(), 3);
    }

    #[test]
    fn test_exports() {
        let assembler = ReportAssembler::new(&InsightsConfig::default());
        let report = assembler
            .assemble("performance", &sample_data(), &ReportOptions::default())
            .unwrap();

        let json = export_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Performance Deep Dive");
        assert_eq!(value["charts"]["conversion_funnel"]["type"], "funnel");
        assert_eq!(value["sections"]["trends"]["type"], "trends");

        let html = export_html(&report);
        assert!(html.contains("<h2>DETAILED METRICS</h2>"));
        assert!(html.contains("<h2>OPTIMIZATION TIPS</h2>"));
    }
}
