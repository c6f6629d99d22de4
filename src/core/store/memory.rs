//! In-memory document store.
//!
//! Keeps the serialized document rather than the struct so every load goes
//! through the same parse path as the file store. Clones share state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::DocumentStore;
use crate::core::domain::VaultDocument;
use crate::error::{PersistenceError, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Replace the raw stored text, bypassing serialization.
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.lock() = Some(raw.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<VaultDocument>> {
        match self.lock().as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| PersistenceError::Parse(e).into()),
        }
    }

    fn save(&self, document: &VaultDocument) -> Result<()> {
        let raw = serde_json::to_string(document).map_err(PersistenceError::Serialize)?;
        *self.lock() = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
