//! Identity type.
//!
//! Wraps the age private key that opens the vault document.

use std::fs;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use crate::core::constants;
use crate::error::{PersistenceError, Result};

/// A private key identity for opening the vault
pub struct Identity {
    inner: x25519::Identity,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key())
            .field("path", &self.path)
            .finish()
    }
}

impl Identity {
    /// Default identity location (`~/.bullpen/identity.key`).
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Identity` if HOME cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            PersistenceError::Identity("unable to determine home directory".to_string())
        })?;
        Ok(home
            .join(constants::IDENTITY_DIR)
            .join(constants::IDENTITY_FILE))
    }

    /// Load an identity from a key file
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Identity` if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading identity");

        if !path.exists() {
            return Err(PersistenceError::Identity(format!(
                "no identity at {}",
                path.display()
            ))
            .into());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = fs::metadata(path) {
                let mode = metadata.permissions().mode() & 0o777;
                if mode != 0o600 {
                    warn!(
                        path = %path.display(),
                        mode = %format!("{:o}", mode),
                        "insecure key file permissions"
                    );
                }
            }
        }

        let contents = zeroize::Zeroizing::new(fs::read_to_string(path).map_err(|e| {
            PersistenceError::Identity(format!("failed to read {}: {}", path.display(), e))
        })?);

        let inner: x25519::Identity = contents
            .trim()
            .parse()
            .map_err(|e: &str| PersistenceError::Identity(e.to_string()))?;

        Ok(Self {
            inner,
            path: Some(path.to_path_buf()),
        })
    }

    /// Generate a new identity and save it to `path` with mode 0600
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Identity` if the key cannot be written.
    pub fn generate(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "generating new identity");

        let inner = x25519::Identity::generate();
        let write_err = |e: std::io::Error| {
            PersistenceError::Identity(format!("failed to write {}: {}", path.display(), e))
        };

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        use age::secrecy::ExposeSecret;
        let secret = inner.to_string();
        fs::write(path, format!("{}\n", secret.expose_secret())).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
        }

        Ok(Self {
            inner,
            path: Some(path.to_path_buf()),
        })
    }

    /// Load the identity at `path`, generating one if absent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Identity` on read or write failure.
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::generate(path)
        }
    }

    /// An in-memory identity that is never written to disk.
    pub fn ephemeral() -> Self {
        Self {
            inner: x25519::Identity::generate(),
            path: None,
        }
    }

    /// Corresponding public key (`age1...`)
    pub fn public_key(&self) -> String {
        self.inner.to_public().to_string()
    }

    pub fn as_age(&self) -> &x25519::Identity {
        &self.inner
    }

    /// Key file path, if the identity lives on disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
