//! Input validation for vault operations.
//!
//! Validates secret keys, project names, and the reserved policy slot.

use crate::core::constants::{POLICY_CATEGORY, SYSTEM_PROJECT};
use crate::error::{Result, ValidationError};

/// Validate a secret key name.
///
/// Secret keys must be valid environment variable names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if let Some(first_char) = key.chars().next() {
        if first_char.is_ascii_digit() {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: "cannot start with a digit".to_string(),
            }
            .into());
        }
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch, i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a user-supplied project name.
///
/// Names starting with `_` are reserved for internal projects.
///
/// # Errors
///
/// Returns `ValidationError::InvalidProject` if the name is empty, reserved,
/// or contains characters other than letters, digits, `-`, `_`, and `.`.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| ValidationError::InvalidProject {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("cannot be empty").into());
    }
    if name.starts_with('_') {
        return Err(invalid("names starting with '_' are reserved").into());
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
    {
        return Err(invalid("only letters, digits, '-', '_' and '.' are allowed").into());
    }

    Ok(())
}

/// Reject writes to the slot where policy records live.
///
/// # Errors
///
/// Returns `ValidationError::ReservedSlot` for `(_system, rotation_policies)`.
pub fn ensure_not_reserved(project: &str, category: &str) -> Result<()> {
    if is_policy_slot(project, category) {
        return Err(ValidationError::ReservedSlot {
            project: project.to_string(),
            category: category.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Whether `(project, category)` addresses stored rotation policies.
pub fn is_policy_slot(project: &str, category: &str) -> bool {
    project == SYSTEM_PROJECT && category == POLICY_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("DATABASE_URL").is_ok());
        assert!(validate_key("API_KEY").is_ok());
        assert!(validate_key("SECRET_123").is_ok());
        assert!(validate_key("_PRIVATE").is_ok());
        assert!(validate_key("api_key").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("123_KEY").is_err());
        assert!(validate_key("API-KEY").is_err());
        assert!(validate_key("API.KEY").is_err());
        assert!(validate_key("API KEY").is_err());
    }

    #[test]
    fn test_project_names() {
        assert!(validate_project_name("payments").is_ok());
        assert!(validate_project_name("web-app.prod").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("_system").is_err());
        assert!(validate_project_name("has space").is_err());
    }

    #[test]
    fn test_reserved_slot() {
        assert!(ensure_not_reserved("_system", "rotation_policies").is_err());
        assert!(ensure_not_reserved("_system", "other").is_ok());
        assert!(ensure_not_reserved("app", "rotation_policies").is_ok());
    }
}
