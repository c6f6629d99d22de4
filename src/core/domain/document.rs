//! The vault document and its record classification.
//!
//! The whole vault is one document. Rotation policies share the same storage
//! as ordinary secrets, so every stored entry is classified into a [`Record`]
//! before use rather than trusting a category string at each call site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Project, RotationPolicy, SecretEntry};
use crate::core::constants::DOCUMENT_VERSION;
use crate::core::types::ProjectName;
use crate::core::validation::is_policy_slot;
use crate::error::{PersistenceError, Result};

/// Root container persisted as a single encrypted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDocument {
    pub version: u32,
    #[serde(default)]
    pub projects: BTreeMap<ProjectName, Project>,
}

impl VaultDocument {
    pub fn new() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            projects: BTreeMap::new(),
        }
    }

    /// Total number of stored entries across all projects.
    pub fn entry_count(&self) -> usize {
        self.projects.values().map(|p| p.secrets.len()).sum()
    }
}

impl Default for VaultDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored entry, classified by what it holds.
#[derive(Debug, Clone)]
pub enum Record {
    /// An ordinary secret (including version snapshots).
    Secret(SecretEntry),
    /// A rotation policy serialized into the reserved slot.
    Policy(Box<RotationPolicy>),
}

impl Record {
    /// Classify an entry stored in `project`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptPolicy` if an entry in the policy slot
    /// does not hold a valid policy.
    pub fn classify(project: &str, entry: &SecretEntry) -> Result<Self> {
        if !is_policy_slot(project, &entry.category) {
            return Ok(Self::Secret(entry.clone()));
        }

        let policy: RotationPolicy =
            serde_json::from_str(&entry.value).map_err(|source| PersistenceError::CorruptPolicy {
                id: entry.key.clone(),
                source,
            })?;
        Ok(Self::Policy(Box::new(policy)))
    }

    pub fn into_policy(self) -> Option<RotationPolicy> {
        match self {
            Self::Policy(policy) => Some(*policy),
            Self::Secret(_) => None,
        }
    }

    pub fn into_secret(self) -> Option<SecretEntry> {
        match self {
            Self::Secret(secret) => Some(secret),
            Self::Policy(_) => None,
        }
    }
}
