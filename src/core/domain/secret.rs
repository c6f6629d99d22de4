//! Secret entry type.
//!
//! A single named, categorized secret. Values are plaintext in memory; only
//! the enclosing document is encrypted at rest.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_CATEGORY;
use crate::core::types::{Category, SecretKey, Timestamp};

/// A secret stored inside a project.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    pub key: SecretKey,
    pub value: String,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub source: String,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
}

fn default_category() -> Category {
    DEFAULT_CATEGORY.to_string()
}

impl SecretEntry {
    /// Create an entry in the default category, stamped with the current time.
    pub fn new(key: impl Into<SecretKey>, value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            value: value.into(),
            category: default_category(),
            description: String::new(),
            tags: BTreeSet::new(),
            source: String::new(),
            created_at: now,
            last_updated_at: now,
        }
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether this entry sits at `(category, key)`.
    pub fn matches(&self, category: &str, key: &str) -> bool {
        self.category == category && self.key == key
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

// Values never show up in debug output.
impl std::fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEntry")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .field("category", &self.category)
            .field("tags", &self.tags)
            .field("source", &self.source)
            .finish()
    }
}

impl std::fmt::Display for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.key)
    }
}
