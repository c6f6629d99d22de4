//! age-encrypted vault file.
//!
//! The document is serialized to JSON, sealed with age, and written through a
//! temp file in the same directory that is renamed over the target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use age::x25519;
use tempfile::NamedTempFile;
use tracing::debug;
use zeroize::Zeroizing;

use super::{DocumentStore, Identity};
use crate::core::cipher::{Age, Cipher};
use crate::core::domain::VaultDocument;
use crate::error::{PersistenceError, Result};

/// Vault document stored as an age-armored file.
pub struct EncryptedFile {
    path: PathBuf,
    identity: Identity,
    recipients: Vec<x25519::Recipient>,
}

impl EncryptedFile {
    /// Open the vault at `path`, sealing for `identity` only.
    pub fn new(path: impl Into<PathBuf>, identity: Identity) -> Self {
        let recipients = vec![identity.as_age().to_public()];
        Self {
            path: path.into(),
            identity,
            recipients,
        }
    }

    /// Also seal for additional recipients (e.g. a break-glass key).
    pub fn with_recipients(mut self, extra: impl IntoIterator<Item = x25519::Recipient>) -> Self {
        self.recipients.extend(extra);
        self
    }
}

impl DocumentStore for EncryptedFile {
    fn load(&self) -> Result<Option<VaultDocument>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "vault file absent, starting empty");
            return Ok(None);
        }

        let sealed = fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let plaintext = Age
            .open(&sealed, self.identity.as_age())
            .map_err(|e| PersistenceError::Decrypt(e.to_string()))?;

        let document: VaultDocument =
            serde_json::from_slice(&plaintext).map_err(PersistenceError::Parse)?;

        debug!(
            path = %self.path.display(),
            projects = document.projects.len(),
            entries = document.entry_count(),
            "vault loaded"
        );
        Ok(Some(document))
    }

    fn save(&self, document: &VaultDocument) -> Result<()> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec_pretty(document).map_err(PersistenceError::Serialize)?,
        );
        let sealed = Age
            .seal(&plaintext, &self.recipients)
            .map_err(|e| PersistenceError::Encrypt(e.to_string()))?;

        write_atomic(&self.path, sealed.as_bytes())?;

        debug!(
            path = %self.path.display(),
            cipher = Age.name(),
            recipients = self.recipients.len(),
            entries = document.entry_count(),
            "vault saved"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `contents` to `path` via a synced temp file and rename.
///
/// The temp file is created with mode 0600 and lives next to the target so
/// the rename stays on one filesystem.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| PersistenceError::Write {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
