//! Static benchmark table: the generic four-tier thresholds used by the
//! metric scorer and the per-industry reference values used by the grader.

use serde::{Deserialize, Serialize};

use crate::types::MetricKind;

/// Four descending thresholds for one metric. For cost per conversion the
/// tiers ascend, since lower spend is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTiers {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
    pub poor: f64,
}

impl MetricTiers {
    pub const fn new(excellent: f64, good: f64, average: f64, poor: f64) -> Self {
        Self {
            excellent,
            good,
            average,
            poor,
        }
    }

    /// Thresholds paired with the fixed score each tier awards.
    pub fn ladder(&self) -> [(f64, u8); 4] {
        [
            (self.excellent, 100),
            (self.good, 80),
            (self.average, 60),
            (self.poor, 40),
        ]
    }
}

/// Tier thresholds for every scored metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSet {
    pub roi: MetricTiers,
    pub ctr: MetricTiers,
    pub conversion: MetricTiers,
    pub efficiency: MetricTiers,
    pub engagement: MetricTiers,
}

impl TierSet {
    pub fn get(&self, kind: MetricKind) -> &MetricTiers {
        match kind {
            MetricKind::Roi => &self.roi,
            MetricKind::Ctr => &self.ctr,
            MetricKind::Conversion => &self.conversion,
            MetricKind::Efficiency => &self.efficiency,
            MetricKind::Engagement => &self.engagement,
        }
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self {
            roi: MetricTiers::new(50.0, 30.0, 15.0, 0.0),
            ctr: MetricTiers::new(4.0, 2.5, 1.5, 0.5),
            conversion: MetricTiers::new(3.0, 2.0, 1.0, 0.3),
            efficiency: MetricTiers::new(0.5, 1.0, 2.0, 5.0),
            engagement: MetricTiers::new(5.0, 3.0, 2.0, 1.0),
        }
    }
}

/// Score cutoffs for the A, B and C grades of one industry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct GradeThresholds {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Reference performance of a typical campaign in one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    pub industry: String,
    pub ctr: f64,
    pub conv_rate: f64,
    pub roi: f64,
    pub grade_thresholds: GradeThresholds,
}

/// Immutable lookup table of supported industries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkTable {
    industries: Vec<IndustryBenchmark>,
}

// (name, ctr %, conversion %, roi %, A, B, C)
const INDUSTRY_ROWS: &[(&str, f64, f64, f64, f64, f64, f64)] = &[
    ("E-commerce", 2.69, 2.81, 150.0, 80.0, 70.0, 60.0),
    ("SaaS/Tech", 2.41, 3.04, 120.0, 82.0, 72.0, 62.0),
    ("Healthcare", 3.27, 3.36, 100.0, 78.0, 68.0, 58.0),
    ("Finance", 2.91, 5.10, 130.0, 85.0, 75.0, 65.0),
    ("Education", 3.78, 3.39, 90.0, 75.0, 65.0, 55.0),
    ("Retail", 2.94, 3.05, 140.0, 80.0, 70.0, 60.0),
    ("Travel", 4.68, 3.55, 110.0, 78.0, 68.0, 58.0),
];

impl BenchmarkTable {
    /// The built-in table of supported industries.
    pub fn standard() -> Self {
        let industries = INDUSTRY_ROWS
            .iter()
            .map(|&(name, ctr, conv_rate, roi, a, b, c)| IndustryBenchmark {
                industry: name.to_string(),
                ctr,
                conv_rate,
                roi,
                grade_thresholds: GradeThresholds { a, b, c },
            })
            .collect();
        Self { industries }
    }

    pub fn from_industries(industries: Vec<IndustryBenchmark>) -> Self {
        Self { industries }
    }

    /// Case-insensitive lookup. `SaaS`, `Tech` and `Ecommerce` are accepted
    /// as aliases of the canonical names.
    pub fn lookup(&self, industry: &str) -> Option<&IndustryBenchmark> {
        let wanted = normalize(industry);
        if wanted.is_empty() {
            return None;
        }
        self.industries.iter().find(|b| {
            let name = normalize(&b.industry);
            name == wanted || name.split('/').any(|part| part == wanted)
        })
    }

    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.industries.iter().map(|b| b.industry.as_str())
    }
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = BenchmarkTable::standard();
        assert_eq!(table.lookup("e-commerce").unwrap().industry, "E-commerce");
        assert_eq!(table.lookup("Ecommerce").unwrap().industry, "E-commerce");
        assert_eq!(table.lookup("FINANCE").unwrap().industry, "Finance");
    }

    #[test]
    fn test_lookup_aliases() {
        let table = BenchmarkTable::standard();
        assert_eq!(table.lookup("SaaS").unwrap().industry, "SaaS/Tech");
        assert_eq!(table.lookup("tech").unwrap().industry, "SaaS/Tech");
        assert_eq!(table.lookup("SaaS/Tech").unwrap().industry, "SaaS/Tech");
    }

    #[test]
    fn test_benchmark_serializes_grading_fields_only() {
        let table = BenchmarkTable::standard();
        let json = serde_json::to_value(table.lookup("Retail").unwrap()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5);
        assert!(json.get("tiers").is_none());
        assert_eq!(json["convRate"], 3.05);
        assert_eq!(json["gradeThresholds"]["A"], 80.0);
    }

    #[test]
    fn test_unknown_industry() {
        let table = BenchmarkTable::standard();
        assert!(table.lookup("Nonexistent").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_all_grade_thresholds_descend() {
        let table = BenchmarkTable::standard();
        assert_eq!(table.industries().count(), 7);
        for b in &table.industries {
            assert!(b.grade_thresholds.a > b.grade_thresholds.b);
            assert!(b.grade_thresholds.b > b.grade_thresholds.c);
            assert!(b.grade_thresholds.c > 50.0);
            assert!(b.ctr > 0.0 && b.conv_rate > 0.0 && b.roi > 0.0);
        }
    }

    #[test]
    fn test_default_tiers_order() {
        let tiers = TierSet::default();
        for kind in MetricKind::ALL {
            let t = tiers.get(kind);
            if kind.higher_is_better() {
                assert!(t.excellent > t.good && t.good > t.average && t.average > t.poor);
            } else {
                assert!(t.excellent < t.good && t.good < t.average && t.average < t.poor);
            }
        }
    }
}
