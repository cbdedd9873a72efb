//! Shared key/value memory store.
//!
//! The store backs the `memory` tool and is the only mutable state shared
//! across sessions. It lives for the process lifetime and is injected into
//! the tool handler as an `Arc<MemoryStore>` - never reached through
//! ambient globals.

use std::collections::HashMap;
use std::sync::RwLock;

/// Process-wide key/value store with last-writer-wins semantics.
///
/// All access goes through one `RwLock`, so concurrent saves to the same key
/// cannot tear; the final value is whichever writer acquired the lock last.
/// The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a value under a key, overwriting any existing value.
    pub fn save(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.write().expect("memory store lock poisoned");
        entries.insert(key.into(), value.into());
    }

    /// Get the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().expect("memory store lock poisoned");
        entries.get(key).cloned()
    }

    /// Remove a key. Returns whether a value existed before removal.
    pub fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.write().expect("memory store lock poisoned");
        entries.remove(key).is_some()
    }

    /// All current keys. Enumeration order is not guaranteed.
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().expect("memory store lock poisoned");
        entries.keys().cloned().collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().expect("memory store lock poisoned");
        entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
