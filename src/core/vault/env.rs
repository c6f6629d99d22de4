//! Env import and export.
//!
//! Moves secrets between the vault and `KEY=VALUE` text.

use chrono::Utc;
use tracing::info;

use super::VaultStore;
use crate::core::constants::{DEFAULT_CATEGORY, IMPORT_SOURCE};
use crate::core::domain::{Env, ImportReport, Record, SecretEntry};
use crate::core::store::DocumentStore;
use crate::core::validation::ensure_not_reserved;
use crate::error::Result;

/// Target and conflict behavior for [`VaultStore::import_env`].
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub project: String,
    pub category: String,
    /// Replace values of keys that already exist.
    pub overwrite: bool,
}

impl ImportOptions {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            category: DEFAULT_CATEGORY.to_string(),
            overwrite: false,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Selection for [`VaultStore::export_env`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub project: String,
    /// Limit to one category; `None` exports every category.
    pub category: Option<String>,
}

impl ExportOptions {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            category: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl<S: DocumentStore> VaultStore<S> {
    /// Import `KEY=VALUE` text into a project.
    ///
    /// A key already present at `(project, category, key)` is reported as a
    /// conflict; with `overwrite` off it is also skipped and left untouched.
    /// When a key repeats in the text the last value wins. Changes stay in
    /// memory until [`VaultStore::save_vault`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the text is malformed or targets the
    /// reserved policy slot. Nothing is imported on error.
    pub fn import_env(&mut self, text: &str, options: &ImportOptions) -> Result<ImportReport> {
        ensure_not_reserved(&options.project, &options.category)?;
        let env = Env::parse(text)?;

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(env.len());
        for (key, value) in env.entries() {
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => pairs.push((key.clone(), value.clone())),
            }
        }

        let mut report = ImportReport::default();
        for (key, value) in pairs {
            let existing = self.secret_mut(&options.project, &options.category, &key);
            match existing {
                Some(_) if !options.overwrite => {
                    report.conflicts.push(key.clone());
                    report.skipped.push(key);
                }
                Some(secret) => {
                    secret.value = value;
                    secret.last_updated_at = Utc::now();
                    report.conflicts.push(key.clone());
                    report.imported.push(key);
                }
                None => {
                    let entry = SecretEntry::new(key.clone(), value)
                        .with_category(options.category.clone())
                        .with_source(IMPORT_SOURCE);
                    self.add_secret(&options.project, entry)?;
                    report.imported.push(key);
                }
            }
        }

        info!(
            project = %options.project,
            category = %options.category,
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            conflicts = report.conflicts.len(),
            "env imported"
        );
        Ok(report)
    }

    /// Render a project's secrets as `KEY=VALUE` text.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Project` if the project does not exist and
    /// `PersistenceError::CorruptPolicy` if it holds an unreadable policy.
    pub fn export_env(&self, options: &ExportOptions) -> Result<String> {
        let wanted = options.category.as_deref();

        let pairs = self
            .records(&options.project)?
            .into_iter()
            .filter_map(Record::into_secret)
            .filter(|s| wanted.map_or(true, |c| s.category == c))
            .map(|s| (s.key, s.value))
            .collect();

        Ok(Env::from_pairs(pairs).to_env_string())
    }
}
