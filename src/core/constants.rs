//! Constants used throughout bullpen.
//!
//! Centralizes reserved names, tags, and file locations.

/// Configuration file name (bullpen.toml).
pub const CONFIG_FILE: &str = "bullpen.toml";

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "BULLPEN_CONFIG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BULLPEN_LOG";

/// Default encrypted vault location, relative to the working directory.
pub const DEFAULT_VAULT_PATH: &str = ".bullpen/vault.age";

/// Identity directory relative to HOME (~/.bullpen).
pub const IDENTITY_DIR: &str = ".bullpen";

/// Identity file name inside [`IDENTITY_DIR`].
pub const IDENTITY_FILE: &str = "identity.key";

/// Version of the persisted document layout.
pub const DOCUMENT_VERSION: u32 = 1;

/// Reserved project holding rotation policies.
pub const SYSTEM_PROJECT: &str = "_system";

/// Category of policy records inside [`SYSTEM_PROJECT`].
pub const POLICY_CATEGORY: &str = "rotation_policies";

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "default";

/// Tag carried by every stored policy record.
pub const POLICY_TAG: &str = "rotation_policy";

/// Tag added to a secret once it has been rotated.
pub const ROTATED_TAG: &str = "rotated";

/// Tag carried by version snapshots.
pub const ROTATED_VERSION_TAG: &str = "rotated_version";

/// Infix between a secret name and the snapshot millis.
pub const VERSION_INFIX: &str = "_v";

/// Source recorded on policy records.
pub const ENGINE_SOURCE: &str = "rotation-engine";

/// Source recorded on secrets created by env import.
pub const IMPORT_SOURCE: &str = "env-import";

/// Fallback offset for an unparseable duration interval.
pub const FALLBACK_DURATION_DAYS: i64 = 30;

/// Fallback offset for a custom interval without a usable cron.
pub const FALLBACK_CUSTOM_DAYS: i64 = 90;

/// Upper bound for generated secret lengths.
pub const MAX_GENERATED_LENGTH: usize = 4096;

/// Default generated secret length.
pub const DEFAULT_GENERATED_LENGTH: usize = 32;
