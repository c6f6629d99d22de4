//! Application context.
//!
//! [`App`] owns the policy engine (and through it the vault) together with
//! the scheduler's policy mirror, and keeps the two in sync. It is an
//! ordinary value: tests build as many isolated instances as they like.

use std::path::Path;

use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::domain::{
    BatchReport, ImportReport, PolicyDraft, RotationOutcome, RotationPolicy, SchedulerCounts,
    SecretEntry,
};
use crate::core::rotation::{Dispatcher, LogDispatcher, PolicyEngine, RotationScheduler};
use crate::core::store::{DocumentStore, EncryptedFile, Identity, MemoryStore};
use crate::core::types::Timestamp;
use crate::core::vault::{ExportOptions, ImportOptions, VaultStore};
use crate::error::{ConfigError, NotFoundError, Result};

/// Vault, engine and scheduler wired together.
pub struct App<S = Box<dyn DocumentStore>, D = LogDispatcher> {
    engine: PolicyEngine<S, D>,
    scheduler: RotationScheduler,
}

impl App {
    /// Open the configured vault.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the identity or vault file
    /// is missing, and `PersistenceError` if the vault cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let identity_path = config.identity_path()?;
        if !identity_path.exists() || !config.vault.path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }

        let identity = Identity::load(&identity_path)?;
        let store =
            EncryptedFile::new(&config.vault.path, identity).with_recipients(config.recipients()?);
        Self::with_store(Box::new(store), LogDispatcher, config)
    }

    /// Create the identity (if absent) and an empty vault file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if the vault file exists.
    pub fn init(config: &Config) -> Result<Self> {
        let vault_path = &config.vault.path;
        if vault_path.exists() {
            return Err(ConfigError::AlreadyInitialized(vault_path.display().to_string()).into());
        }
        if let Some(dir) = vault_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let identity = Identity::load_or_generate(&config.identity_path()?)?;
        info!(
            vault = %vault_path.display(),
            public_key = %identity.public_key(),
            "vault initialized"
        );

        let store = EncryptedFile::new(vault_path, identity).with_recipients(config.recipients()?);
        let mut app = Self::with_store(Box::new(store), LogDispatcher, config)?;
        app.vault_mut().save_vault()?;
        Ok(app)
    }
}

impl App<MemoryStore> {
    /// An empty vault that lives only in memory.
    pub fn in_memory() -> Self {
        Self::from_engine(PolicyEngine::new(VaultStore::new(MemoryStore::new())))
    }
}

impl<S: DocumentStore, D: Dispatcher> App<S, D> {
    /// Wire up an arbitrary store and dispatcher, seeding the scheduler
    /// from the stored policies.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid rotation defaults and
    /// `PersistenceError` if the store cannot be read.
    pub fn with_store(store: S, dispatcher: D, config: &Config) -> Result<Self> {
        let engine = PolicyEngine::with_dispatcher(VaultStore::new(store), dispatcher)
            .with_defaults(config.policy_defaults()?);
        let mut app = Self::from_engine(engine);
        app.reload()?;
        Ok(app)
    }

    pub fn from_engine(engine: PolicyEngine<S, D>) -> Self {
        Self {
            engine,
            scheduler: RotationScheduler::new(),
        }
    }

    /// Reload the vault and rebuild the scheduler mirror from it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the store cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        self.engine.vault_mut().load_vault()?;
        self.scheduler = RotationScheduler::from_policies(self.engine.get_all_policies()?);
        Ok(())
    }

    pub fn vault(&self) -> &VaultStore<S> {
        self.engine.vault()
    }

    pub fn vault_mut(&mut self) -> &mut VaultStore<S> {
        self.engine.vault_mut()
    }

    pub fn engine_mut(&mut self) -> &mut PolicyEngine<S, D> {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &RotationScheduler {
        &self.scheduler
    }

    /// Create a project and save.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad or taken name.
    pub fn create_project(&mut self, name: &str, description: &str) -> Result<()> {
        let vault = self.engine.vault_mut();
        vault.load_vault()?;
        vault.create_project(name, description)?;
        vault.save_vault()
    }

    /// Add or replace a secret and save.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an invalid key or the reserved slot.
    pub fn set_secret(&mut self, project: &str, entry: SecretEntry) -> Result<bool> {
        let vault = self.engine.vault_mut();
        vault.load_vault()?;
        let replaced = vault.add_secret(project, entry)?;
        vault.save_vault()?;
        Ok(replaced)
    }

    /// Delete a secret and save.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if the secret does not exist.
    pub fn remove_secret(&mut self, project: &str, category: &str, key: &str) -> Result<SecretEntry> {
        let vault = self.engine.vault_mut();
        vault.load_vault()?;
        let removed = vault.delete_secret(project, category, key)?;
        vault.save_vault()?;
        Ok(removed)
    }

    /// Import env text and save.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for malformed text; nothing is saved then.
    pub fn import_env(&mut self, text: &str, options: &ImportOptions) -> Result<ImportReport> {
        let vault = self.engine.vault_mut();
        vault.load_vault()?;
        let report = vault.import_env(text, options)?;
        vault.save_vault()?;
        Ok(report)
    }

    /// # Errors
    ///
    /// Returns `NotFoundError::Project` if the project does not exist.
    pub fn export_env(&self, options: &ExportOptions) -> Result<String> {
        self.engine.vault().export_env(options)
    }

    /// Read an env file from disk and import it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read.
    pub fn import_env_file(&mut self, path: &Path, options: &ImportOptions) -> Result<ImportReport> {
        let text = zeroize::Zeroizing::new(std::fs::read_to_string(path)?);
        self.import_env(&text, options)
    }

    /// Create or merge a policy and mirror it.
    ///
    /// # Errors
    ///
    /// Returns any error from [`PolicyEngine::save_policy`].
    pub fn save_policy(&mut self, draft: &PolicyDraft) -> Result<RotationPolicy> {
        let policy = self.engine.save_policy(draft)?;
        self.scheduler.add_policy(policy.clone());
        Ok(policy)
    }

    /// Merge `draft` into an existing policy.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Policy` if no policy has that id.
    pub fn update_policy(&mut self, policy_id: &str, draft: &PolicyDraft) -> Result<RotationPolicy> {
        if self.engine.get_policy(policy_id)?.is_none() {
            return Err(NotFoundError::Policy(policy_id.to_string()).into());
        }
        let draft = PolicyDraft {
            policy_id: Some(policy_id.to_string()),
            ..draft.clone()
        };
        self.save_policy(&draft)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the vault cannot be saved.
    pub fn delete_policy(&mut self, policy_id: &str) -> Result<bool> {
        let removed = self.engine.delete_policy(policy_id)?;
        self.scheduler.remove_policy(policy_id);
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `NotFoundError::Policy` if no policy has that id.
    pub fn get_policy(&mut self, policy_id: &str) -> Result<RotationPolicy> {
        self.engine
            .get_policy(policy_id)?
            .ok_or_else(|| NotFoundError::Policy(policy_id.to_string()).into())
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if a policy record is unreadable.
    pub fn list_policies(&mut self) -> Result<Vec<RotationPolicy>> {
        self.engine.get_all_policies()
    }

    /// Rotate by policy id and bring the mirror in line with the outcome.
    ///
    /// # Errors
    ///
    /// Returns any error from [`PolicyEngine::rotate_secret`].
    pub fn rotate_by_id(&mut self, policy_id: &str) -> Result<RotationOutcome> {
        let outcome = self.engine.rotate_secret(policy_id)?;
        self.scheduler.apply_outcome(&mut self.engine, policy_id, &outcome);
        Ok(outcome)
    }

    /// Rotate the secret at `(project, category, secret_name)`.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::PolicyForSecret` if no policy targets it.
    pub fn rotate_by_secret(
        &mut self,
        secret_name: &str,
        project: &str,
        category: &str,
    ) -> Result<RotationOutcome> {
        let policy = self
            .engine
            .find_policy_for_secret(secret_name, project, category)?
            .ok_or_else(|| NotFoundError::PolicyForSecret {
                project: project.to_string(),
                category: category.to_string(),
                secret_name: secret_name.to_string(),
            })?;
        debug!(policy_id = %policy.policy_id, "resolved policy for secret");
        self.rotate_by_id(&policy.policy_id)
    }

    /// Policies due at `now`, earliest first.
    pub fn due_at(&self, now: Timestamp) -> Vec<RotationPolicy> {
        self.scheduler.due_at(now).into_iter().cloned().collect()
    }

    pub fn due(&self) -> Vec<RotationPolicy> {
        self.scheduler
            .get_policies_due_for_rotation()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> SchedulerCounts {
        self.scheduler.counts()
    }

    /// Run every due rotation.
    pub fn trigger_due(&mut self) -> BatchReport {
        self.scheduler.trigger_due_rotations(&mut self.engine)
    }

    pub fn trigger_due_at(&mut self, now: Timestamp) -> BatchReport {
        self.scheduler.trigger_due_rotations_at(now, &mut self.engine)
    }
}
