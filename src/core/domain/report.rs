//! Result types returned by vault and rotation operations.

use serde::Serialize;

use crate::core::types::{PolicyId, SecretKey, Timestamp};

/// Outcome of an env import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Keys written to the vault.
    pub imported: Vec<SecretKey>,
    /// Keys left untouched because they existed and overwrite was off.
    pub skipped: Vec<SecretKey>,
    /// Keys that already existed before the import.
    pub conflicts: Vec<SecretKey>,
}

/// Why a rotation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    PolicyNotFound,
    PolicyDisabled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyNotFound => write!(f, "policy not found"),
            Self::PolicyDisabled => write!(f, "policy disabled"),
        }
    }
}

/// Result of a single `rotate_secret` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RotationOutcome {
    Rotated {
        policy_id: PolicyId,
        secret_name: SecretKey,
        /// Key of the snapshot taken before the value changed.
        version_key: Option<SecretKey>,
        next_rotation_date: Timestamp,
    },
    /// Benign no-op: the policy is missing or disabled.
    Skipped { reason: SkipReason },
}

impl RotationOutcome {
    pub fn rotated(&self) -> bool {
        matches!(self, Self::Rotated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Success,
    Failure,
    Skipped,
}

/// Per-policy entry in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyResult {
    pub policy_id: PolicyId,
    pub secret_name: SecretKey,
    pub status: PolicyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate of one `trigger_due_rotations` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<PolicyResult>,
}

impl BatchReport {
    pub fn record(&mut self, result: PolicyResult) {
        self.total += 1;
        match result.status {
            PolicyStatus::Success => self.successful += 1,
            PolicyStatus::Failure => self.failed += 1,
            PolicyStatus::Skipped => self.skipped += 1,
        }
        self.results.push(result);
    }

    pub fn result_for(&self, policy_id: &str) -> Option<&PolicyResult> {
        self.results.iter().find(|r| r.policy_id == policy_id)
    }
}

/// Scheduler introspection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerCounts {
    pub total: usize,
    pub enabled: usize,
    pub due: usize,
}
