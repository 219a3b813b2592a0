//! Secret Store: the persistence collaborator of the flow controller.
//!
//! Values are JSON. On wasm the store is browser LocalStorage, on native it is
//! a small SQLite key/value table in the platform data directory.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(not(target_arch = "wasm32"))]
mod sqlite;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteStore;

/// Key holding the saved secret sequence.
pub const SEQUENCE_KEY: &str = "songSequence";
/// Key holding the unshuffled copy written when the login gate is enabled.
pub const ORIGINAL_ORDER_KEY: &str = "selectedSongs";

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait SecretStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: SecretStore + ?Sized> SecretStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-process store. Used by tests and as the fallback when the platform
/// store cannot be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Opens the durable store for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_platform_store() -> Result<Box<dyn SecretStore>, StoreError> {
    Ok(Box::new(SqliteStore::open_default()?))
}

#[cfg(target_arch = "wasm32")]
pub fn open_platform_store() -> Result<Box<dyn SecretStore>, StoreError> {
    Ok(Box::new(BrowserStore::new()))
}

/// The durable store, or an in-memory one if it cannot be opened.
pub fn open_store_or_memory() -> Box<dyn SecretStore> {
    match open_platform_store() {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Failed to open secret store, sequence will not survive a reload: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(SEQUENCE_KEY).unwrap(), None);

        store.set(SEQUENCE_KEY, json!(["A", "B"])).unwrap();
        assert_eq!(store.get(SEQUENCE_KEY).unwrap(), Some(json!(["A", "B"])));
        assert_eq!(store.len(), 1);

        store.remove(SEQUENCE_KEY).unwrap();
        assert!(store.is_empty());
        // removing a missing key is fine
        store.remove(SEQUENCE_KEY).unwrap();
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn SecretStore> = Box::new(MemoryStore::new());
        store.set(ORIGINAL_ORDER_KEY, json!(["X"])).unwrap();
        assert_eq!(store.get(ORIGINAL_ORDER_KEY).unwrap(), Some(json!(["X"])));
        store.remove(ORIGINAL_ORDER_KEY).unwrap();
        assert_eq!(store.get(ORIGINAL_ORDER_KEY).unwrap(), None);
    }
}
