//! Rotation scheduler.
//!
//! Keeps an in-memory mirror of policies keyed by id and decides which are
//! due. The mirror is seeded from the engine and refreshed after every
//! rotation it triggers; there is no background timer. An external driver
//! calls [`RotationScheduler::trigger_due_rotations`].

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::engine::PolicyEngine;
use super::hooks::Dispatcher;
use crate::core::domain::{
    BatchReport, PolicyDraft, PolicyResult, PolicyStatus, RotationOutcome, RotationPolicy,
    SchedulerCounts, SkipReason,
};
use crate::core::store::DocumentStore;
use crate::core::types::{PolicyId, Timestamp};
use crate::error::{NotFoundError, Result};

#[derive(Debug, Clone, Default)]
pub struct RotationScheduler {
    policies: BTreeMap<PolicyId, RotationPolicy>,
}

impl RotationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the mirror, typically from [`PolicyEngine::get_all_policies`].
    pub fn from_policies(policies: impl IntoIterator<Item = RotationPolicy>) -> Self {
        let mut scheduler = Self::new();
        for policy in policies {
            scheduler.add_policy(policy);
        }
        debug!(policies = scheduler.policies.len(), "scheduler seeded");
        scheduler
    }

    /// Track `policy`, replacing any entry with the same id.
    pub fn add_policy(&mut self, policy: RotationPolicy) -> Option<RotationPolicy> {
        self.policies.insert(policy.policy_id.clone(), policy)
    }

    pub fn remove_policy(&mut self, policy_id: &str) -> bool {
        self.policies.remove(policy_id).is_some()
    }

    /// Merge `draft` into the mirrored policy.
    ///
    /// The next date is re-derived from the stored schedule base, so
    /// toggling `is_enabled` never moves it.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Policy` if the id is not mirrored, or a
    /// `ValidationError` if the merged policy is invalid. The mirror is
    /// unchanged on error.
    pub fn update_policy(&mut self, policy_id: &str, draft: &PolicyDraft) -> Result<RotationPolicy> {
        let current = self
            .policies
            .get(policy_id)
            .ok_or_else(|| NotFoundError::Policy(policy_id.to_string()))?;

        let mut updated = current.clone();
        updated.apply(draft)?;
        self.policies.insert(policy_id.to_string(), updated.clone());
        Ok(updated)
    }

    pub fn get_policy(&self, policy_id: &str) -> Option<&RotationPolicy> {
        self.policies.get(policy_id)
    }

    pub fn list_policies(&self) -> Vec<&RotationPolicy> {
        self.policies.values().collect()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Enabled policies due now, earliest first.
    pub fn get_policies_due_for_rotation(&self) -> Vec<&RotationPolicy> {
        self.due_at(Utc::now())
    }

    /// Enabled policies with `next_rotation_date <= now`, earliest first.
    pub fn due_at(&self, now: Timestamp) -> Vec<&RotationPolicy> {
        let mut due: Vec<&RotationPolicy> =
            self.policies.values().filter(|p| p.is_due(now)).collect();
        due.sort_by(|a, b| {
            a.next_rotation_date
                .cmp(&b.next_rotation_date)
                .then_with(|| a.policy_id.cmp(&b.policy_id))
        });
        due
    }

    pub fn counts(&self) -> SchedulerCounts {
        self.counts_at(Utc::now())
    }

    pub fn counts_at(&self, now: Timestamp) -> SchedulerCounts {
        SchedulerCounts {
            total: self.policies.len(),
            enabled: self.policies.values().filter(|p| p.is_enabled).count(),
            due: self.policies.values().filter(|p| p.is_due(now)).count(),
        }
    }

    /// Rotate every policy due now.
    pub fn trigger_due_rotations<S, D>(&mut self, engine: &mut PolicyEngine<S, D>) -> BatchReport
    where
        S: DocumentStore,
        D: Dispatcher,
    {
        self.trigger_due_rotations_at(Utc::now(), engine)
    }

    /// Rotate every policy due at `now`.
    ///
    /// Each policy is attempted once. A failure is recorded in the report and
    /// never stops the batch.
    pub fn trigger_due_rotations_at<S, D>(
        &mut self,
        now: Timestamp,
        engine: &mut PolicyEngine<S, D>,
    ) -> BatchReport
    where
        S: DocumentStore,
        D: Dispatcher,
    {
        let due: Vec<(PolicyId, String)> = self
            .due_at(now)
            .into_iter()
            .map(|p| (p.policy_id.clone(), p.secret_name.clone()))
            .collect();

        let mut report = BatchReport::default();
        for (policy_id, secret_name) in due {
            let (status, error) = match engine.rotate_secret(&policy_id) {
                Ok(outcome) => {
                    self.apply_outcome(engine, &policy_id, &outcome);
                    match outcome {
                        RotationOutcome::Rotated { .. } => (PolicyStatus::Success, None),
                        RotationOutcome::Skipped { reason } => {
                            (PolicyStatus::Skipped, Some(reason.to_string()))
                        }
                    }
                }
                Err(e) => (PolicyStatus::Failure, Some(e.to_string())),
            };

            report.record(PolicyResult {
                policy_id,
                secret_name,
                status,
                error,
            });
        }

        info!(
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            skipped = report.skipped,
            "rotation batch finished"
        );
        report
    }

    /// Bring the mirrored copy of `policy_id` in line with a rotation outcome.
    ///
    /// A missing policy is dropped; a rotated or disabled one is re-read
    /// from the engine's store.
    pub fn apply_outcome<S, D>(
        &mut self,
        engine: &mut PolicyEngine<S, D>,
        policy_id: &str,
        outcome: &RotationOutcome,
    ) where
        S: DocumentStore,
        D: Dispatcher,
    {
        match outcome {
            RotationOutcome::Skipped {
                reason: SkipReason::PolicyNotFound,
            } => {
                self.remove_policy(policy_id);
            }
            RotationOutcome::Rotated { .. }
            | RotationOutcome::Skipped {
                reason: SkipReason::PolicyDisabled,
            } => self.refresh(engine, policy_id),
        }
    }

    /// Replace the mirrored copy of `policy_id` with the stored one.
    fn refresh<S, D>(&mut self, engine: &mut PolicyEngine<S, D>, policy_id: &str)
    where
        S: DocumentStore,
        D: Dispatcher,
    {
        match engine.get_policy(policy_id) {
            Ok(Some(policy)) => {
                self.add_policy(policy);
            }
            Ok(None) => {
                self.remove_policy(policy_id);
            }
            Err(e) => warn!(policy_id = %policy_id, error = %e, "failed to refresh policy"),
        }
    }
}
