//! Rotation policy engine.
//!
//! Owns the [`VaultStore`], persists policies as records in the reserved
//! `_system/rotation_policies` slot, and runs the rotation protocol.
//!
//! A rotation is not transactional. With versioning on, the snapshot is
//! saved before the new value is generated, so a later failure leaves the
//! snapshot in place and the live value unchanged.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::generate;
use super::hooks::{Dispatcher, LogDispatcher};
use crate::core::constants::{ROTATED_TAG, ROTATED_VERSION_TAG, VERSION_INFIX};
use crate::core::domain::{
    HookType, NotificationEvent, PolicyDefaults, PolicyDraft, RotationOutcome, RotationPolicy,
    SecretEntry, SkipReason,
};
use crate::core::store::DocumentStore;
use crate::core::types::Timestamp;
use crate::core::validation::{ensure_not_reserved, validate_key, validate_project_name};
use crate::core::vault::VaultStore;
use crate::error::{ExecutionError, Result, ValidationError};

const ROTATION_NOTE: &str = "[rotated at ";

/// Policy CRUD and the rotation protocol over a single vault.
#[derive(Debug)]
pub struct PolicyEngine<S, D = LogDispatcher> {
    vault: VaultStore<S>,
    dispatcher: D,
    defaults: PolicyDefaults,
}

impl<S: DocumentStore> PolicyEngine<S, LogDispatcher> {
    /// Engine that only logs hooks and notifications.
    pub fn new(vault: VaultStore<S>) -> Self {
        Self::with_dispatcher(vault, LogDispatcher)
    }
}

impl<S: DocumentStore, D: Dispatcher> PolicyEngine<S, D> {
    pub fn with_dispatcher(vault: VaultStore<S>, dispatcher: D) -> Self {
        Self {
            vault,
            dispatcher,
            defaults: PolicyDefaults::default(),
        }
    }

    /// Defaults applied when a new policy omits its interval or strategy.
    pub fn with_defaults(mut self, defaults: PolicyDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn vault(&self) -> &VaultStore<S> {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut VaultStore<S> {
        &mut self.vault
    }

    /// Create or update a policy and persist it.
    ///
    /// With an id, an existing policy is merged and a missing one is created
    /// under that id. Without an id, a policy already targeting the same
    /// `(project, category, secret_name)` is merged; otherwise a new UUID is
    /// assigned. `next_rotation_date` is re-derived on every save.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an incomplete or invalid policy and
    /// `PersistenceError` if the vault cannot be loaded or saved.
    pub fn save_policy(&mut self, draft: &PolicyDraft) -> Result<RotationPolicy> {
        self.vault.load_vault()?;
        let policies = self.vault.policy_records()?;

        let existing = match (&draft.policy_id, &draft.secret_name, &draft.project) {
            (Some(id), _, _) => policies.iter().find(|p| &p.policy_id == id),
            (None, Some(name), Some(project)) => policies
                .iter()
                .find(|p| p.targets(project, draft.category_or_default(), name)),
            _ => None,
        }
        .cloned();

        let policy = match existing {
            Some(mut policy) => {
                policy.apply(draft)?;
                debug!(policy_id = %policy.policy_id, "policy merged");
                policy
            }
            None => {
                let id = draft
                    .policy_id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                RotationPolicy::from_draft(draft, id, &self.defaults)?
            }
        };

        ensure_not_reserved(&policy.project, &policy.category)?;
        validate_project_name(&policy.project)?;
        validate_key(&policy.secret_name)?;

        // One policy per secret.
        if let Some(owner) = policies.iter().find(|p| {
            p.policy_id != policy.policy_id
                && p.targets(&policy.project, &policy.category, &policy.secret_name)
        }) {
            return Err(ValidationError::InvalidPolicy(format!(
                "{}/{}/{} is already governed by policy {}",
                policy.project, policy.category, policy.secret_name, owner.policy_id
            ))
            .into());
        }

        self.vault.put_policy_record(&policy)?;
        self.vault.save_vault()?;

        info!(
            policy_id = %policy.policy_id,
            project = %policy.project,
            secret = %policy.secret_name,
            next = %policy.next_rotation_date,
            "policy saved"
        );
        Ok(policy)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the vault or a policy record is unreadable.
    pub fn get_policy(&mut self, policy_id: &str) -> Result<Option<RotationPolicy>> {
        Ok(self
            .get_all_policies()?
            .into_iter()
            .find(|p| p.policy_id == policy_id))
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the vault or a policy record is unreadable.
    pub fn get_all_policies(&mut self) -> Result<Vec<RotationPolicy>> {
        self.vault.ensure_loaded()?;
        self.vault.policy_records()
    }

    /// Delete a policy. Returns `false` if it did not exist.
    ///
    /// Version snapshots taken under the policy stay in their project.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the vault cannot be loaded or saved.
    pub fn delete_policy(&mut self, policy_id: &str) -> Result<bool> {
        self.vault.load_vault()?;
        if !self.vault.remove_policy_record(policy_id) {
            debug!(policy_id = %policy_id, "no policy to delete");
            return Ok(false);
        }
        self.vault.save_vault()?;
        info!(policy_id = %policy_id, "policy deleted");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the vault or a policy record is unreadable.
    pub fn find_policy_for_secret(
        &mut self,
        secret_name: &str,
        project: &str,
        category: &str,
    ) -> Result<Option<RotationPolicy>> {
        Ok(self
            .get_all_policies()?
            .into_iter()
            .find(|p| p.targets(project, category, secret_name)))
    }

    /// Rotate the secret governed by `policy_id`.
    ///
    /// A missing or disabled policy is a no-op reported as
    /// [`RotationOutcome::Skipped`]. Any failure once the target lookup has
    /// started fires the FAILURE notification before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::TargetMissing` if the secret does not exist,
    /// `ExecutionError::UnsupportedStrategy` for delegated strategies, and
    /// `PersistenceError` if the vault cannot be loaded or saved.
    pub fn rotate_secret(&mut self, policy_id: &str) -> Result<RotationOutcome> {
        self.vault.load_vault()?;

        let Some(policy) = self
            .vault
            .policy_records()?
            .into_iter()
            .find(|p| p.policy_id == policy_id)
        else {
            debug!(policy_id = %policy_id, "rotation skipped: no such policy");
            return Ok(RotationOutcome::Skipped {
                reason: SkipReason::PolicyNotFound,
            });
        };

        if !policy.is_enabled {
            debug!(policy_id = %policy_id, "rotation skipped: policy disabled");
            return Ok(RotationOutcome::Skipped {
                reason: SkipReason::PolicyDisabled,
            });
        }

        self.run_hooks(&policy, HookType::PreRotation);

        match self.execute(policy.clone()) {
            Ok((rotated, version_key)) => {
                self.run_hooks(&rotated, HookType::PostRotation);
                self.notify(&rotated, NotificationEvent::Success, None);

                info!(
                    policy_id = %rotated.policy_id,
                    project = %rotated.project,
                    secret = %rotated.secret_name,
                    next = %rotated.next_rotation_date,
                    "secret rotated"
                );
                Ok(RotationOutcome::Rotated {
                    policy_id: rotated.policy_id,
                    secret_name: rotated.secret_name,
                    version_key,
                    next_rotation_date: rotated.next_rotation_date,
                })
            }
            Err(e) => {
                warn!(policy_id = %policy.policy_id, error = %e, "rotation failed");
                let detail = e.to_string();
                self.notify(&policy, NotificationEvent::Failure, Some(&detail));
                Err(e)
            }
        }
    }

    fn execute(&mut self, mut policy: RotationPolicy) -> Result<(RotationPolicy, Option<String>)> {
        let target = self
            .vault
            .find_secret(&policy.project, &policy.category, &policy.secret_name)
            .cloned()
            .ok_or_else(|| target_missing(&policy))?;

        let now = Utc::now();
        let version_key = if policy.versioning_enabled {
            let key = self.snapshot(&policy, &target, now)?;
            self.prune_versions(&policy);
            self.vault.save_vault()?;
            Some(key)
        } else {
            None
        };

        let value = generate::regenerate(&policy.regeneration_strategy)?;

        let secret = self
            .vault
            .secret_mut(&policy.project, &policy.category, &policy.secret_name)
            .ok_or_else(|| target_missing(&policy))?;
        secret.value = value;
        secret.tags.insert(ROTATED_TAG.to_string());
        secret.description = annotate(&secret.description, now);
        secret.last_updated_at = now;

        policy.mark_rotated(now);
        self.vault.put_policy_record(&policy)?;
        self.vault.save_vault()?;

        Ok((policy, version_key))
    }

    /// Store a copy of `target` under a fresh `{name}_v{millis}` key.
    fn snapshot(
        &mut self,
        policy: &RotationPolicy,
        target: &SecretEntry,
        now: Timestamp,
    ) -> Result<String> {
        let project = self
            .vault
            .project_mut(&policy.project)
            .ok_or_else(|| target_missing(policy))?;

        // Keep version keys ordered even when rotations share a millisecond.
        let newest = project
            .secrets
            .iter()
            .filter(|s| s.category == policy.category)
            .filter_map(|s| version_millis(&policy.secret_name, &s.key))
            .max();
        let mut millis = match newest {
            Some(newest) if newest >= now.timestamp_millis() => newest + 1,
            _ => now.timestamp_millis(),
        };
        let mut key = version_key(&policy.secret_name, millis);
        while project.find(&policy.category, &key).is_some() {
            millis += 1;
            key = version_key(&policy.secret_name, millis);
        }

        let mut version = target.clone();
        version.key = key.clone();
        version.tags.insert(ROTATED_VERSION_TAG.to_string());
        version.created_at = now;
        version.last_updated_at = now;
        project.secrets.push(version);

        debug!(policy_id = %policy.policy_id, version = %key, "version snapshot taken");
        Ok(key)
    }

    /// Drop the oldest versions beyond `max_versions_to_keep`.
    fn prune_versions(&mut self, policy: &RotationPolicy) {
        let Some(keep) = policy.max_versions_to_keep else {
            return;
        };
        let Some(project) = self.vault.project_mut(&policy.project) else {
            return;
        };

        let mut versions: Vec<(i64, String)> = project
            .secrets
            .iter()
            .filter(|s| s.category == policy.category && s.has_tag(ROTATED_VERSION_TAG))
            .filter_map(|s| version_millis(&policy.secret_name, &s.key).map(|m| (m, s.key.clone())))
            .collect();
        if versions.len() <= keep {
            return;
        }

        versions.sort();
        let excess = versions.len() - keep;
        for (_, key) in versions.into_iter().take(excess) {
            project.remove(&policy.category, &key);
            debug!(policy_id = %policy.policy_id, version = %key, "version pruned");
        }
    }

    fn run_hooks(&self, policy: &RotationPolicy, hook_type: HookType) {
        for hook in policy.hooks.iter().filter(|h| h.hook_type == hook_type) {
            if let Err(e) = self.dispatcher.run_hook(policy, hook) {
                warn!(
                    policy_id = %policy.policy_id,
                    target = %hook.target,
                    error = %e,
                    "hook failed"
                );
            }
        }
    }

    fn notify(&self, policy: &RotationPolicy, event: NotificationEvent, detail: Option<&str>) {
        for notification in policy.notifications.iter().filter(|n| n.wants(event)) {
            if let Err(e) = self.dispatcher.notify(policy, notification, event, detail) {
                warn!(
                    policy_id = %policy.policy_id,
                    target = %notification.target,
                    error = %e,
                    "notification failed"
                );
            }
        }
    }
}

fn version_key(secret_name: &str, millis: i64) -> String {
    format!("{}{}{}", secret_name, VERSION_INFIX, millis)
}

/// Embedded millis of a version key for `secret_name`, if `key` is one.
fn version_millis(secret_name: &str, key: &str) -> Option<i64> {
    let suffix = key.strip_prefix(secret_name)?.strip_prefix(VERSION_INFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Replace any earlier rotation note with one for `at`.
fn annotate(description: &str, at: Timestamp) -> String {
    let base = match description.find(ROTATION_NOTE) {
        Some(index) => description[..index].trim_end(),
        None => description.trim_end(),
    };
    let note = format!("{}{}]", ROTATION_NOTE, at.to_rfc3339());
    if base.is_empty() {
        note
    } else {
        format!("{} {}", base, note)
    }
}

fn target_missing(policy: &RotationPolicy) -> crate::error::Error {
    ExecutionError::TargetMissing {
        project: policy.project.clone(),
        category: policy.category.clone(),
        secret_name: policy.secret_name.clone(),
    }
    .into()
}
