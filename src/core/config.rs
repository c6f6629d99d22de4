//! Configuration file management.
//!
//! Handles reading, writing, and validating `bullpen.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::parse_recipient;
use crate::core::constants;
use crate::core::domain::{PolicyDefaults, RegenerationStrategy, RotationInterval};
use crate::core::store::Identity;
use crate::error::{ConfigError, Error, Result};

/// Settings stored in `bullpen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultSettings,
    #[serde(default)]
    pub rotation: RotationSettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// Where the encrypted document and its key live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Encrypted vault document.
    #[serde(default = "default_vault_path")]
    pub path: PathBuf,
    /// age identity file; defaults to `~/.bullpen/identity.key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<PathBuf>,
    /// Extra age public keys the vault is also sealed for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
            identity: None,
            recipients: Vec::new(),
        }
    }
}

fn default_vault_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_VAULT_PATH)
}

/// Defaults for policies that leave fields unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSettings {
    #[serde(default = "default_interval")]
    pub default_interval: String,
    #[serde(default = "default_length")]
    pub default_length: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            default_interval: default_interval(),
            default_length: default_length(),
        }
    }
}

fn default_interval() -> String {
    RotationInterval::Monthly.to_string()
}

fn default_length() -> usize {
    constants::DEFAULT_GENERATED_LENGTH
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSettings {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Find the config file to use.
    ///
    /// Order: `explicit`, then `$BULLPEN_CONFIG`, then `./bullpen.toml`.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(constants::CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        let local = PathBuf::from(constants::CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Load the located config, or defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicitly located file is unreadable,
    /// malformed, or invalid.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from `path`.
    ///
    /// A leading `~` in the vault and identity paths expands to the home
    /// directory. Other relative paths are resolved against the config
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile`, `ConfigError::Parse`, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        config.resolve_relative_to(path.parent().filter(|p| !p.as_os_str().is_empty()));

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: Option<&Path>) {
        self.vault.path = resolve_path(&self.vault.path, base);
        if let Some(identity) = &self.vault.identity {
            self.vault.identity = Some(resolve_path(identity, base));
        }
    }

    /// Identity path, falling back to the per-user default.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and HOME is unknown.
    pub fn identity_path(&self) -> Result<PathBuf> {
        match &self.vault.identity {
            Some(path) => Ok(path.clone()),
            None => Identity::default_path(),
        }
    }

    /// Parsed extra recipients from `[vault] recipients`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a key that is not an age
    /// public key.
    pub fn recipients(&self) -> Result<Vec<age::x25519::Recipient>> {
        self.vault
            .recipients
            .iter()
            .map(|key| {
                parse_recipient(key).map_err(|e| {
                    Error::from(ConfigError::InvalidValue {
                        field: "vault.recipients",
                        reason: e.to_string(),
                    })
                })
            })
            .collect()
    }

    /// Defaults applied to newly created policies.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configured interval is invalid.
    pub fn policy_defaults(&self) -> Result<PolicyDefaults> {
        let interval: RotationInterval =
            self.rotation
                .default_interval
                .parse()
                .map_err(|e: crate::error::ValidationError| ConfigError::InvalidValue {
                    field: "rotation.default_interval",
                    reason: e.to_string(),
                })?;

        Ok(PolicyDefaults {
            interval,
            strategy: RegenerationStrategy::alphanumeric(self.rotation.default_length),
        })
    }

    /// Validate the configuration contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.vault.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "vault.path",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if self.rotation.default_length == 0
            || self.rotation.default_length > constants::MAX_GENERATED_LENGTH
        {
            return Err(ConfigError::InvalidValue {
                field: "rotation.default_length",
                reason: format!(
                    "must be between 1 and {}",
                    constants::MAX_GENERATED_LENGTH
                ),
            }
            .into());
        }

        self.recipients()?;

        let defaults = self.policy_defaults()?;
        if defaults.interval == RotationInterval::Custom {
            return Err(ConfigError::InvalidValue {
                field: "rotation.default_interval",
                reason: "custom intervals need a per-policy cron".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory, then anchor what is still
/// relative at `base`.
fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };
    match base {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}
