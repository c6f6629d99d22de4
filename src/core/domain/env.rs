//! Env type.
//!
//! Parses and renders `KEY=VALUE` text, one variable per line.

use crate::core::validation::validate_key;
use crate::error::{Result, ValidationError};

/// Parsed env text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    entries: Vec<(String, String)>,
}

impl Env {
    /// Parse env text.
    ///
    /// Skips empty lines and comments (lines starting with #). A leading
    /// `export ` is ignored. A matched pair of surrounding `"` or `'` is
    /// stripped; double-quoted values are unescaped.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedEnvLine` for a line without `=` or
    /// with an invalid key.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=').ok_or_else(|| {
                ValidationError::MalformedEnvLine {
                    line: index + 1,
                    reason: "expected KEY=VALUE".to_string(),
                }
            })?;

            let key = key.trim();
            validate_key(key).map_err(|e| ValidationError::MalformedEnvLine {
                line: index + 1,
                reason: e.to_string(),
            })?;

            entries.push((key.to_string(), parse_env_value(value.trim())));
        }

        Ok(Self { entries })
    }

    /// Create from raw key-value pairs
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { entries: pairs }
    }

    /// Get a value by key
    ///
    /// When a key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All entries as key-value pairs
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to env text.
    ///
    /// Values containing whitespace, or starting or ending with a quote, are
    /// double-quoted and escaped.
    pub fn to_env_string(&self) -> String {
        let mut output = String::new();

        for (key, value) in &self.entries {
            if needs_quotes(value) {
                output.push_str(&format!("{}=\"{}\"\n", key, escape_env_value(value)));
            } else {
                output.push_str(&format!("{}={}\n", key, value));
            }
        }

        output
    }
}

fn parse_env_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.chars().any(|ch| ch.is_whitespace())
        || value.starts_with('"')
        || value.ends_with('"')
        || value.starts_with('\'')
        || value.ends_with('\'')
}

fn escape_env_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_env_string())
    }
}
