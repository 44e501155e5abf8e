//! A/B test lifecycle over a caller-owned repository.
//!
//! `running -> paused -> running`, and `running | paused -> completed`.
//! Significance is recomputed on every traffic update until the test is
//! completed, at which point the winner is fixed for good.

use campaign_core::config::ExperimentConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::store::InMemoryRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::significance::SignificanceEngine;
use crate::types::{AbTest, AbTestStatus, AbVariant};

/// Confidence level recorded on tests created without one.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 95.0;

pub struct ExperimentEngine {
    tests: Arc<InMemoryRepository<AbTest>>,
    significance: SignificanceEngine,
}

impl ExperimentEngine {
    pub fn new(tests: Arc<InMemoryRepository<AbTest>>, config: &ExperimentConfig) -> Self {
        Self {
            tests,
            significance: SignificanceEngine::new(config),
        }
    }

    pub fn significance(&self) -> &SignificanceEngine {
        &self.significance
    }

    /// Create a running test whose variants start without traffic.
    pub fn create_test(
        &self,
        name: &str,
        variant_names: &[&str],
        control_index: usize,
        confidence_level: Option<f64>,
    ) -> CampaignResult<Uuid> {
        if variant_names.len() < 2 {
            return Err(CampaignError::Validation(
                "an A/B test needs at least two variants".into(),
            ));
        }
        if control_index >= variant_names.len() {
            return Err(CampaignError::Validation(format!(
                "control index {control_index} out of range for {} variants",
                variant_names.len()
            )));
        }

        let now = Utc::now();
        let test = AbTest {
            id: Uuid::new_v4(),
            name: name.to_string(),
            variants: variant_names
                .iter()
                .enumerate()
                .map(|(i, n)| AbVariant::new(*n, i == control_index))
                .collect(),
            status: AbTestStatus::Running,
            confidence_level: confidence_level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL),
            statistical_significance: None,
            winner: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        let id = test.id;
        self.tests.upsert(test);

        info!(test_id = %id, name, variants = variant_names.len(), "A/B test created");
        metrics::counter!("experiments.created").increment(1);
        Ok(id)
    }

    pub fn get_test(&self, id: &Uuid) -> CampaignResult<AbTest> {
        self.tests.get(id).ok_or(CampaignError::NotFound {
            kind: "A/B test",
            id: *id,
        })
    }

    pub fn list_tests(&self) -> Vec<AbTest> {
        let mut tests = self.tests.list();
        tests.sort_by_key(|t| t.created_at);
        tests
    }

    pub fn delete_test(&self, id: &Uuid) -> CampaignResult<AbTest> {
        self.tests.delete(id).ok_or(CampaignError::NotFound {
            kind: "A/B test",
            id: *id,
        })
    }

    /// Add newly observed visitors and conversions to one variant.
    pub fn record_traffic(
        &self,
        test_id: &Uuid,
        variant_id: &Uuid,
        visitors: u64,
        conversions: u64,
    ) -> CampaignResult<AbTest> {
        self.apply_counts(test_id, variant_id, |v| {
            (
                v.visitors.saturating_add(visitors),
                v.conversions.saturating_add(conversions),
            )
        })
    }

    /// Replace one variant's counts with an absolute snapshot.
    pub fn sync_counts(
        &self,
        test_id: &Uuid,
        variant_id: &Uuid,
        visitors: u64,
        conversions: u64,
    ) -> CampaignResult<AbTest> {
        self.apply_counts(test_id, variant_id, |_| (visitors, conversions))
    }

    pub fn pause(&self, id: &Uuid) -> CampaignResult<AbTest> {
        self.transition(id, AbTestStatus::Paused)
    }

    pub fn resume(&self, id: &Uuid) -> CampaignResult<AbTest> {
        self.transition(id, AbTestStatus::Running)
    }

    /// Complete the test. The winner computed here never changes again.
    pub fn stop(&self, id: &Uuid) -> CampaignResult<AbTest> {
        self.transition(id, AbTestStatus::Completed)
    }

    fn apply_counts(
        &self,
        test_id: &Uuid,
        variant_id: &Uuid,
        next_counts: impl FnOnce(&AbVariant) -> (u64, u64),
    ) -> CampaignResult<AbTest> {
        let significance = &self.significance;
        self.tests
            .update(test_id, |test| {
                match test.status {
                    AbTestStatus::Completed => return Err(CampaignError::TestCompleted(test.id)),
                    AbTestStatus::Paused => {
                        return Err(CampaignError::Validation(format!(
                            "A/B test {} is paused and does not accept traffic",
                            test.id
                        )))
                    }
                    AbTestStatus::Running => {}
                }

                let variant = test
                    .variants
                    .iter_mut()
                    .find(|v| v.id == *variant_id)
                    .ok_or(CampaignError::NotFound {
                        kind: "variant",
                        id: *variant_id,
                    })?;

                let (visitors, conversions) = next_counts(variant);
                let mut candidate = variant.clone();
                candidate.visitors = visitors;
                candidate.conversions = conversions;
                candidate.validate()?;
                candidate.refresh();
                *variant = candidate;

                recompute(test, significance);
                test.updated_at = Utc::now();
                Ok(test.clone())
            })
            .unwrap_or(Err(CampaignError::NotFound {
                kind: "A/B test",
                id: *test_id,
            }))
    }

    fn transition(&self, id: &Uuid, to: AbTestStatus) -> CampaignResult<AbTest> {
        let significance = &self.significance;
        let result = self
            .tests
            .update(id, |test| {
                let from = test.status;
                let allowed = matches!(
                    (from, to),
                    (AbTestStatus::Running, AbTestStatus::Paused)
                        | (AbTestStatus::Paused, AbTestStatus::Running)
                        | (AbTestStatus::Running, AbTestStatus::Completed)
                        | (AbTestStatus::Paused, AbTestStatus::Completed)
                );
                if !allowed {
                    return Err(CampaignError::InvalidTransition {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }

                let now = Utc::now();
                if to == AbTestStatus::Completed {
                    recompute(test, significance);
                    test.completed_at = Some(now);
                }
                test.status = to;
                test.updated_at = now;
                Ok(test.clone())
            })
            .unwrap_or(Err(CampaignError::NotFound {
                kind: "A/B test",
                id: *id,
            }))?;

        info!(test_id = %id, status = %result.status, winner = ?result.winner, "A/B test status changed");
        if result.is_completed() {
            metrics::counter!("experiments.completed").increment(1);
        }
        Ok(result)
    }
}

/// Refresh derived variant fields and the test-level significance.
fn recompute(test: &mut AbTest, significance: &SignificanceEngine) {
    if test.is_completed() {
        return;
    }
    for variant in &mut test.variants {
        variant.refresh();
    }
    let result = significance.evaluate(&test.variants).ok();
    test.winner = result.as_ref().and_then(|r| r.winner);
    test.statistical_significance = result;

    metrics::counter!("experiments.significance_evaluations").increment(1);
    debug!(test_id = %test.id, winner = ?test.winner, "A/B test significance refreshed");
}
