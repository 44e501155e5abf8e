//! Two-proportion z-test between a control and a treatment variant.

use campaign_core::config::ExperimentConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use tracing::debug;

use crate::stats::two_tailed_p_value;
use crate::types::{AbRecommendation, AbVariant, SignificanceResult};

/// Sample-size confidence for a single variant, monotonic and capped at 99.
pub fn variant_confidence(visitors: u64) -> f64 {
    let v = visitors as f64;
    if visitors < 100 {
        (v / 2.0).min(50.0)
    } else if visitors < 1000 {
        (50.0 + (v - 100.0) / 20.0).min(80.0)
    } else {
        (80.0 + (v - 1000.0) / 100.0).min(99.0)
    }
}

/// Decides significance at `experiments.significance_level`, 0.05 (95 %)
/// unless a deployment overrides it. The per-test `confidence_level` stored
/// on an [`AbTest`](crate::types::AbTest) never takes part in the decision.
#[derive(Debug, Clone)]
pub struct SignificanceEngine {
    min_visitors: u64,
    significance_level: f64,
    p_value_floor: f64,
}

impl SignificanceEngine {
    pub fn new(config: &ExperimentConfig) -> Self {
        Self {
            min_visitors: config.min_visitors,
            significance_level: config.significance_level,
            p_value_floor: config.p_value_floor,
        }
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    /// Evaluate a two-variant test: exactly one control and one treatment.
    pub fn compute_significance(&self, variants: &[AbVariant]) -> CampaignResult<SignificanceResult> {
        let [a, b] = variants else {
            return Err(CampaignError::Validation(format!(
                "significance needs exactly two variants, got {}",
                variants.len()
            )));
        };
        match (a.is_control, b.is_control) {
            (true, false) => Ok(self.compare(a, b)),
            (false, true) => Ok(self.compare(b, a)),
            _ => Err(CampaignError::Validation(
                "exactly one variant must be the control".into(),
            )),
        }
    }

    /// Evaluate any number of treatments against the single control and
    /// return the comparison with the largest z-score.
    pub fn evaluate(&self, variants: &[AbVariant]) -> CampaignResult<SignificanceResult> {
        let mut controls = variants.iter().filter(|v| v.is_control);
        let control = match (controls.next(), controls.next()) {
            (Some(control), None) => control,
            _ => {
                return Err(CampaignError::Validation(
                    "exactly one variant must be the control".into(),
                ))
            }
        };

        variants
            .iter()
            .filter(|v| !v.is_control)
            .map(|treatment| self.compare(control, treatment))
            .reduce(|best, next| if next.z_score > best.z_score { next } else { best })
            .ok_or_else(|| CampaignError::Validation("a test needs at least one treatment".into()))
    }

    pub fn compare(&self, control: &AbVariant, treatment: &AbVariant) -> SignificanceResult {
        let control_rate = control.rate();
        let treatment_rate = treatment.rate();
        let lift = if control_rate > 0.0 {
            (treatment_rate - control_rate) / control_rate * 100.0
        } else {
            0.0
        };

        if control.visitors < self.min_visitors || treatment.visitors < self.min_visitors {
            return SignificanceResult {
                is_significant: false,
                p_value: 1.0,
                confidence: 0.0,
                z_score: 0.0,
                recommendation: AbRecommendation::NeedMoreData,
                control_id: control.id,
                treatment_id: treatment.id,
                lift,
                winner: None,
            };
        }

        // Summed as floats; the u64 counts may be near their maximum.
        let total_visitors = control.visitors as f64 + treatment.visitors as f64;
        let pooled = (control.conversions as f64 + treatment.conversions as f64) / total_visitors;
        let standard_error = (pooled
            * (1.0 - pooled)
            * (1.0 / control.visitors as f64 + 1.0 / treatment.visitors as f64))
            .sqrt();

        let z_score = if standard_error > 0.0 && standard_error.is_finite() {
            (control_rate - treatment_rate).abs() / standard_error
        } else {
            0.0
        };
        let p_value = two_tailed_p_value(z_score).max(self.p_value_floor);
        let is_significant = p_value < self.significance_level;
        let confidence = ((1.0 - p_value) * 100.0).clamp(50.0, 99.0);

        let winner = if !is_significant {
            None
        } else if treatment_rate > control_rate {
            Some(treatment.id)
        } else if control_rate > treatment_rate {
            Some(control.id)
        } else {
            None
        };

        let recommendation = match winner {
            Some(id) if id == treatment.id => AbRecommendation::ImplementVariant,
            Some(_) => AbRecommendation::KeepControl,
            None => AbRecommendation::ContinueTesting,
        };

        debug!(
            z_score,
            p_value,
            is_significant,
            control = %control.id,
            treatment = %treatment.id,
            "significance computed"
        );

        SignificanceResult {
            is_significant,
            p_value,
            confidence,
            z_score,
            recommendation,
            control_id: control.id,
            treatment_id: treatment.id,
            lift,
            winner,
        }
    }
}

impl Default for SignificanceEngine {
    fn default() -> Self {
        Self::new(&ExperimentConfig::default())
    }
}
