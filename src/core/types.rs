//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret key name (e.g., DATABASE_URL, API_KEY).
///
/// Must be a valid environment variable name.
pub type SecretKey = String;

/// A project name (namespace inside the vault).
pub type ProjectName = String;

/// A secret category (e.g., "database", "api").
pub type Category = String;

/// A rotation policy identifier.
pub type PolicyId = String;

/// A UTC timestamp.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
