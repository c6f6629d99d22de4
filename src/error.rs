//! Error types.
//!
//! One variant per error class. Each class wraps its own `thiserror` enum so
//! callers can match on the class without caring about the exact cause.

use thiserror::Error;

/// Top-level error for all bullpen operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by caller input rather than by the system.
    ///
    /// Validation, not-found and config errors are client errors (4xx). Persistence,
    /// execution, cipher and io failures are server errors (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_) | Self::Config(_))
    }
}

/// Malformed input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret key cannot be empty")]
    EmptyKey,

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProject { name: String, reason: String },

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("'{project}/{category}' is reserved for rotation policies")]
    ReservedSlot { project: String, category: String },

    #[error("malformed env line {line}: {reason}")]
    MalformedEnvLine { line: usize, reason: String },

    #[error("policy is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("custom rotation interval requires a cron expression")]
    MissingCron,

    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    #[error("invalid rotation interval: {0}")]
    InvalidInterval(String),

    #[error("invalid regeneration strategy: {0}")]
    InvalidStrategy(String),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}

/// A targeted entity does not exist.
#[derive(Error, Debug)]
pub enum NotFoundError {
    #[error("project not found: {0}")]
    Project(String),

    #[error("secret not found: {project}/{category}/{key}")]
    Secret {
        project: String,
        category: String,
        key: String,
    },

    #[error("rotation policy not found: {0}")]
    Policy(String),

    #[error("no rotation policy for secret {project}/{category}/{secret_name}")]
    PolicyForSecret {
        project: String,
        category: String,
        secret_name: String,
    },
}

/// Reading or writing the encrypted document failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read vault {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write vault {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decrypt vault: {0}")]
    Decrypt(String),

    #[error("failed to encrypt vault: {0}")]
    Encrypt(String),

    #[error("vault document is corrupt: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize vault document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored rotation policy '{id}' is corrupt: {source}")]
    CorruptPolicy {
        id: String,
        source: serde_json::Error,
    },

    #[error("identity key error: {0}")]
    Identity(String),
}

/// A rotation could not complete.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("rotation target missing: {project}/{category}/{secret_name}")]
    TargetMissing {
        project: String,
        category: String,
        secret_name: String,
    },

    #[error("regeneration strategy '{0}' is not supported yet")]
    UnsupportedStrategy(&'static str),

    #[error("generator failed: {0}")]
    Generator(String),

    #[error("hook {target} failed: {reason}")]
    Hook { target: String, reason: String },

    #[error("notification to {target} failed: {reason}")]
    Notification { target: String, reason: String },
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("vault not initialized: run `bullpen init` first")]
    NotInitialized,

    #[error("vault already initialized at {0}")]
    AlreadyInitialized(String),
}

/// age encryption failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor failed: {0}")]
    ArmorFailed(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
