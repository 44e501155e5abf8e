//! Industry-aware grading against benchmark reference values.

use campaign_core::benchmarks::{BenchmarkTable, IndustryBenchmark};
use campaign_core::types::{Grade, MetricSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs for industry grading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeInput {
    pub roi: f64,
    pub ctr: f64,
    pub conv_rate: f64,
}

impl From<&MetricSet> for GradeInput {
    fn from(metrics: &MetricSet) -> Self {
        Self {
            roi: metrics.roi.unwrap_or(0.0),
            ctr: metrics.ctr.unwrap_or(0.0),
            conv_rate: metrics.conversion_rate.unwrap_or(0.0),
        }
    }
}

/// Signed percentage deltas against the industry benchmark, one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub ctr: f64,
    pub conv_rate: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGrade {
    pub grade: Grade,
    pub score: u32,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_comparison: Option<BenchmarkComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl AiGrade {
    /// Low-confidence grade returned for industries missing from the table.
    pub fn fallback() -> Self {
        Self {
            grade: Grade::C,
            score: 60,
            confidence: 50,
            benchmark_comparison: None,
            industry: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndustryGrader {
    table: BenchmarkTable,
}

impl IndustryGrader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: BenchmarkTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BenchmarkTable {
        &self.table
    }

    pub fn grade_against_industry(&self, input: &GradeInput, industry: &str) -> AiGrade {
        let Some(benchmark) = self.table.lookup(industry) else {
            debug!(industry, "unknown industry, using fallback grade");
            return AiGrade::fallback();
        };
        grade_with_benchmark(input, benchmark)
    }
}

fn grade_with_benchmark(input: &GradeInput, benchmark: &IndustryBenchmark) -> AiGrade {
    let ctr_ratio = ratio(input.ctr, benchmark.ctr);
    let conv_ratio = ratio(input.conv_rate, benchmark.conv_rate);
    let roi_ratio = ratio(input.roi, benchmark.roi);
    let avg_ratio = (ctr_ratio + conv_ratio + roi_ratio) / 3.0;

    let raw = (ctr_ratio * 20.0).min(25.0)
        + (conv_ratio * 25.0).min(30.0)
        + (roi_ratio * 30.0).min(35.0)
        + (avg_ratio * 8.0).min(10.0);

    let confidence = gate(ctr_ratio, 0.8, 25, 15)
        + gate(conv_ratio, 0.9, 30, 20)
        + gate(roi_ratio, 1.0, 35, 25)
        + gate(avg_ratio, 1.2, 10, 5);

    // The grade is read off the reported score so the two always agree.
    let score = raw.max(0.0).round();
    let thresholds = &benchmark.grade_thresholds;
    let grade = if score >= 90.0 {
        Grade::APlus
    } else if score >= thresholds.a {
        Grade::A
    } else if score >= thresholds.b {
        Grade::B
    } else if score >= thresholds.c {
        Grade::C
    } else if score >= 50.0 {
        Grade::D
    } else {
        Grade::F
    };

    AiGrade {
        grade,
        score: score as u32,
        confidence: confidence.min(100),
        benchmark_comparison: Some(BenchmarkComparison {
            ctr: delta_percent(ctr_ratio),
            conv_rate: delta_percent(conv_ratio),
            roi: delta_percent(roi_ratio),
        }),
        industry: Some(benchmark.industry.clone()),
    }
}

fn ratio(value: f64, reference: f64) -> f64 {
    if reference <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    value / reference
}

fn gate(ratio: f64, threshold: f64, met: u8, missed: u8) -> u8 {
    if ratio >= threshold {
        met
    } else {
        missed
    }
}

fn delta_percent(ratio: f64) -> f64 {
    ((ratio - 1.0) * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_multiple_of_ecommerce(k: f64) -> GradeInput {
        GradeInput {
            roi: 150.0 * k,
            ctr: 2.69 * k,
            conv_rate: 2.81 * k,
        }
    }

    #[test]
    fn test_unknown_industry_fallback() {
        let grade = IndustryGrader::new().grade_against_industry(&GradeInput::default(), "Nonexistent");
        assert_eq!(grade.grade, Grade::C);
        assert_eq!(grade.score, 60);
        assert_eq!(grade.confidence, 50);
        assert!(grade.benchmark_comparison.is_none());
    }

    #[test]
    fn test_exactly_at_benchmark() {
        let grade =
            IndustryGrader::new().grade_against_industry(&at_multiple_of_ecommerce(1.0), "E-commerce");
        // 20 + 25 + 30 + 8
        assert_eq!(grade.score, 83);
        assert_eq!(grade.grade, Grade::A);
        assert_eq!(grade.confidence, 95);
        let cmp = grade.benchmark_comparison.unwrap();
        assert_eq!(cmp.ctr, 0.0);
        assert_eq!(cmp.conv_rate, 0.0);
        assert_eq!(cmp.roi, 0.0);
    }

    #[test]
    fn test_double_benchmark_caps_components() {
        let grade =
            IndustryGrader::new().grade_against_industry(&at_multiple_of_ecommerce(2.0), "ecommerce");
        assert_eq!(grade.score, 100);
        assert_eq!(grade.grade, Grade::APlus);
        assert_eq!(grade.confidence, 100);
        let cmp = grade.benchmark_comparison.unwrap();
        assert_eq!(cmp.roi, 100.0);
    }

    #[test]
    fn test_half_benchmark_is_failing() {
        let grade =
            IndustryGrader::new().grade_against_industry(&at_multiple_of_ecommerce(0.5), "E-commerce");
        // 10 + 12.5 + 15 + 4 = 41.5
        assert_eq!(grade.score, 42);
        assert_eq!(grade.grade, Grade::F);
        assert_eq!(grade.confidence, 65);
        assert_eq!(grade.benchmark_comparison.unwrap().ctr, -50.0);
    }

    #[test]
    fn test_industry_thresholds_shift_grade() {
        // Raw score 83 is an A in E-commerce (A >= 80) but a B in Finance (A >= 85).
        let finance = GradeInput {
            roi: 130.0,
            ctr: 2.91,
            conv_rate: 5.10,
        };
        let grade = IndustryGrader::new().grade_against_industry(&finance, "Finance");
        assert_eq!(grade.score, 83);
        assert_eq!(grade.grade, Grade::B);
        assert_eq!(grade.industry.as_deref(), Some("Finance"));
    }

    fn finance_with_roi_ratio(roi_ratio: f64) -> GradeInput {
        // ctr and conversion components sit at their caps (25 and 30)
        GradeInput {
            roi: 130.0 * roi_ratio,
            ctr: 2.91 * 1.25,
            conv_rate: 5.10 * 1.2,
        }
    }

    #[test]
    fn test_grade_follows_rounded_score() {
        let grader = IndustryGrader::new();

        // raw ~89.6
        let grade = grader.grade_against_industry(&finance_with_roi_ratio(0.8592), "Finance");
        assert_eq!(grade.score, 90);
        assert_eq!(grade.grade, Grade::APlus);

        // raw ~89.4
        let grade = grader.grade_against_industry(&finance_with_roi_ratio(0.853), "Finance");
        assert_eq!(grade.score, 89);
        assert_eq!(grade.grade, Grade::A);
    }

    #[test]
    fn test_negative_roi_never_negative_score() {
        let input = GradeInput {
            roi: -900.0,
            ctr: 0.0,
            conv_rate: 0.0,
        };
        let grade = IndustryGrader::new().grade_against_industry(&input, "Retail");
        assert_eq!(grade.score, 0);
        assert_eq!(grade.grade, Grade::F);
    }

    #[test]
    fn test_from_metric_set() {
        let metrics = MetricSet {
            roi: Some(80.0),
            conversion_rate: Some(2.0),
            ..Default::default()
        };
        let input = GradeInput::from(&metrics);
        assert_eq!(input.roi, 80.0);
        assert_eq!(input.ctr, 0.0);
        assert_eq!(input.conv_rate, 2.0);
    }

    #[test]
    fn test_json_field_names() {
        let grade =
            IndustryGrader::new().grade_against_industry(&at_multiple_of_ecommerce(1.0), "E-commerce");
        let json = serde_json::to_value(&grade).unwrap();
        assert_eq!(json["grade"], "A");
        assert!(json["benchmarkComparison"]["convRate"].is_number());
    }
}
