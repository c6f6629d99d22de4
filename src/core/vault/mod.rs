//! The vault store.
//!
//! `VaultStore` owns the decrypted document in memory and is the only path
//! to the [`DocumentStore`]. Callers follow a reload-before-write discipline:
//! `load_vault`, mutate, `save_vault`. Nothing is written implicitly.

mod env;

pub use env::{ExportOptions, ImportOptions};

use chrono::Utc;
use tracing::{debug, info};

use crate::core::constants::{ENGINE_SOURCE, POLICY_CATEGORY, POLICY_TAG, SYSTEM_PROJECT};
use crate::core::domain::{Project, Record, RotationPolicy, SecretEntry, VaultDocument};
use crate::core::store::DocumentStore;
use crate::core::validation::{ensure_not_reserved, validate_key, validate_project_name};
use crate::error::{NotFoundError, PersistenceError, Result, ValidationError};

/// In-memory model of projects and secrets backed by a document store.
#[derive(Debug)]
pub struct VaultStore<S> {
    store: S,
    document: VaultDocument,
    loaded: bool,
}

impl<S: DocumentStore> VaultStore<S> {
    /// Wrap a store. Nothing is read until [`VaultStore::load_vault`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            document: VaultDocument::new(),
            loaded: false,
        }
    }

    /// Decrypt and parse the document, replacing the in-memory copy.
    ///
    /// Safe to call repeatedly. A store with nothing saved yields an empty vault.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the document cannot be read or parsed.
    /// The in-memory copy is left unchanged on error.
    pub fn load_vault(&mut self) -> Result<()> {
        self.document = self.store.load()?.unwrap_or_default();
        self.loaded = true;
        debug!(
            location = %self.store.location(),
            projects = self.document.projects.len(),
            "vault reloaded"
        );
        Ok(())
    }

    /// Load once if nothing has been loaded yet.
    ///
    /// # Errors
    ///
    /// Returns any error from [`VaultStore::load_vault`].
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load_vault()?;
        }
        Ok(())
    }

    /// Serialize and re-encrypt the whole document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the write fails.
    pub fn save_vault(&mut self) -> Result<()> {
        self.store.save(&self.document)?;
        self.loaded = true;
        Ok(())
    }

    /// Create an empty project.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidProject` for a bad or reserved name and
    /// `ValidationError::ProjectExists` if the name is taken.
    pub fn create_project(&mut self, name: &str, description: &str) -> Result<&Project> {
        validate_project_name(name)?;
        if self.document.projects.contains_key(name) {
            return Err(ValidationError::ProjectExists(name.to_string()).into());
        }

        info!(project = %name, "project created");
        Ok(self
            .document
            .projects
            .entry(name.to_string())
            .or_insert_with(|| Project::new(name, description)))
    }

    /// # Errors
    ///
    /// Returns `NotFoundError::Project` if no such project exists.
    pub fn get_project(&self, name: &str) -> Result<&Project> {
        self.document
            .projects
            .get(name)
            .ok_or_else(|| NotFoundError::Project(name.to_string()).into())
    }

    pub fn list_projects(&self) -> impl Iterator<Item = &Project> {
        self.document.projects.values()
    }

    /// Add a secret, or update it if `(project, category, key)` already exists.
    ///
    /// The project is created if missing. Returns `true` when an existing
    /// entry was replaced.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an invalid key, an invalid new project
    /// name, or the reserved policy slot.
    pub fn add_secret(&mut self, project: &str, entry: SecretEntry) -> Result<bool> {
        ensure_not_reserved(project, &entry.category)?;
        validate_key(&entry.key)?;

        let target = self.project_or_create(project)?;
        let replaced = target.upsert(entry);
        debug!(project = %project, replaced, "secret stored");
        Ok(replaced)
    }

    /// Replace the contents of an existing secret.
    ///
    /// The entry's value, description, tags, and source are applied; the
    /// identity triple and `created_at` stay as stored.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if the project or secret does not exist.
    pub fn update_secret(
        &mut self,
        project: &str,
        category: &str,
        key: &str,
        entry: SecretEntry,
    ) -> Result<()> {
        ensure_not_reserved(project, category)?;

        let existing = self
            .secret_mut(project, category, key)
            .ok_or_else(|| secret_not_found(project, category, key))?;

        existing.value = entry.value.clone();
        existing.description = entry.description.clone();
        existing.tags = entry.tags.clone();
        existing.source = entry.source.clone();
        existing.last_updated_at = Utc::now();

        debug!(project = %project, category = %category, key = %key, "secret updated");
        Ok(())
    }

    /// Remove a secret, returning it.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if the project or secret does not exist.
    pub fn delete_secret(&mut self, project: &str, category: &str, key: &str) -> Result<SecretEntry> {
        ensure_not_reserved(project, category)?;

        let removed = self
            .document
            .projects
            .get_mut(project)
            .ok_or_else(|| NotFoundError::Project(project.to_string()))?
            .remove(category, key)
            .ok_or_else(|| secret_not_found(project, category, key))?;

        debug!(project = %project, category = %category, key = %key, "secret deleted");
        Ok(removed)
    }

    pub fn find_secret(&self, project: &str, category: &str, key: &str) -> Option<&SecretEntry> {
        self.document.projects.get(project)?.find(category, key)
    }

    /// Secrets in `project`, optionally limited to one category.
    ///
    /// Policy records are never included.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Project` if the project does not exist.
    pub fn list_secrets(&self, project: &str, category: Option<&str>) -> Result<Vec<&SecretEntry>> {
        let found = self.get_project(project)?;
        Ok(found
            .secrets_in(category)
            .into_iter()
            .filter(|s| !crate::core::validation::is_policy_slot(project, &s.category))
            .collect())
    }

    /// Every entry in `project`, classified.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Project` for a missing project and
    /// `PersistenceError::CorruptPolicy` for an unreadable policy record.
    pub fn records(&self, project: &str) -> Result<Vec<Record>> {
        self.get_project(project)?
            .secrets
            .iter()
            .map(|entry| Record::classify(project, entry))
            .collect()
    }

    pub(crate) fn secret_mut(
        &mut self,
        project: &str,
        category: &str,
        key: &str,
    ) -> Option<&mut SecretEntry> {
        self.document.projects.get_mut(project)?.find_mut(category, key)
    }

    pub(crate) fn project_mut(&mut self, project: &str) -> Option<&mut Project> {
        self.document.projects.get_mut(project)
    }

    /// All stored rotation policies.
    pub(crate) fn policy_records(&self) -> Result<Vec<RotationPolicy>> {
        let Some(system) = self.document.projects.get(SYSTEM_PROJECT) else {
            return Ok(Vec::new());
        };

        let mut policies = Vec::new();
        for entry in system.secrets_in(Some(POLICY_CATEGORY)) {
            if let Some(policy) = Record::classify(SYSTEM_PROJECT, entry)?.into_policy() {
                policies.push(policy);
            }
        }
        Ok(policies)
    }

    /// Store a policy in the reserved slot, creating `_system` if needed.
    pub(crate) fn put_policy_record(&mut self, policy: &RotationPolicy) -> Result<()> {
        let value = serde_json::to_string(policy).map_err(PersistenceError::Serialize)?;
        let entry = SecretEntry::new(policy.policy_id.clone(), value)
            .with_category(POLICY_CATEGORY)
            .with_description(format!(
                "Rotation policy for {}/{}/{}",
                policy.project, policy.category, policy.secret_name
            ))
            .with_source(ENGINE_SOURCE)
            .with_tag(POLICY_TAG);

        self.document
            .projects
            .entry(SYSTEM_PROJECT.to_string())
            .or_insert_with(|| Project::new(SYSTEM_PROJECT, "Internal records"))
            .upsert(entry);
        Ok(())
    }

    /// Remove a policy record. Returns `false` if it was not stored.
    pub(crate) fn remove_policy_record(&mut self, policy_id: &str) -> bool {
        self.document
            .projects
            .get_mut(SYSTEM_PROJECT)
            .and_then(|p| p.remove(POLICY_CATEGORY, policy_id))
            .is_some()
    }

    fn project_or_create(&mut self, name: &str) -> Result<&mut Project> {
        if !self.document.projects.contains_key(name) {
            validate_project_name(name)?;
            info!(project = %name, "project created implicitly");
        }
        Ok(self
            .document
            .projects
            .entry(name.to_string())
            .or_insert_with(|| Project::new(name, "")))
    }
}

fn secret_not_found(project: &str, category: &str, key: &str) -> crate::error::Error {
    NotFoundError::Secret {
        project: project.to_string(),
        category: category.to_string(),
        key: key.to_string(),
    }
    .into()
}
