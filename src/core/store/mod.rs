//! Encrypted document storage.
//!
//! The vault is loaded and saved as a whole through a [`DocumentStore`].
//! Implementations must make `save` atomic: readers observe either the
//! previous document or the new one, never a partial write.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `DocumentStore` trait
//! 2. Add the implementation in a new file (e.g., `s3.rs`)
//! 3. Re-export from this module

use crate::core::domain::VaultDocument;
use crate::error::Result;

mod file;
mod identity;
mod memory;

pub use file::EncryptedFile;
pub use identity::Identity;
pub use memory::MemoryStore;

/// Whole-document load/save boundary.
pub trait DocumentStore {
    /// Load the current document.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the document cannot be read, decrypted,
    /// or parsed.
    fn load(&self) -> Result<Option<VaultDocument>>;

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if serialization, encryption, or the write
    /// fails. On error the previous document is left intact.
    fn save(&self, document: &VaultDocument) -> Result<()>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn load(&self) -> Result<Option<VaultDocument>> {
        (**self).load()
    }

    fn save(&self, document: &VaultDocument) -> Result<()> {
        (**self).save(document)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
