//! Project type.
//!
//! A named namespace holding an ordered list of secrets.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::SecretEntry;
use crate::core::types::{ProjectName, Timestamp};

/// A namespace of secrets inside the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: ProjectName,
    #[serde(default)]
    pub description: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub secrets: Vec<SecretEntry>,
}

impl Project {
    pub fn new(name: impl Into<ProjectName>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
            secrets: Vec::new(),
        }
    }

    /// Find the secret at `(category, key)`.
    pub fn find(&self, category: &str, key: &str) -> Option<&SecretEntry> {
        self.secrets.iter().find(|s| s.matches(category, key))
    }

    pub fn find_mut(&mut self, category: &str, key: &str) -> Option<&mut SecretEntry> {
        self.secrets.iter_mut().find(|s| s.matches(category, key))
    }

    /// Insert or replace the secret at the entry's `(category, key)`.
    ///
    /// Replacing keeps the original `created_at` and position.
    /// Returns `true` when an existing entry was replaced.
    pub fn upsert(&mut self, mut entry: SecretEntry) -> bool {
        match self.find_mut(&entry.category, &entry.key) {
            Some(existing) => {
                entry.created_at = existing.created_at;
                entry.last_updated_at = Utc::now();
                *existing = entry;
                true
            }
            None => {
                self.secrets.push(entry);
                false
            }
        }
    }

    /// Remove the secret at `(category, key)`, returning it.
    pub fn remove(&mut self, category: &str, key: &str) -> Option<SecretEntry> {
        let index = self.secrets.iter().position(|s| s.matches(category, key))?;
        Some(self.secrets.remove(index))
    }

    /// Secrets in `category`, or all secrets when `category` is `None`.
    pub fn secrets_in(&self, category: Option<&str>) -> Vec<&SecretEntry> {
        self.secrets
            .iter()
            .filter(|s| category.map_or(true, |c| s.category == c))
            .collect()
    }
}
