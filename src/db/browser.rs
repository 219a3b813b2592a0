use super::{SecretStore, StoreError};
use gloo_storage::{errors::StorageError, LocalStorage, Storage};
use serde_json::Value;

const KEY_PREFIX: &str = "songauth.";

/// Browser LocalStorage. Durable across reloads, no expiry, no encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    pub fn new() -> Self {
        Self
    }

    fn storage_key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

impl SecretStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match LocalStorage::get::<Value>(Self::storage_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(StoreError::Serialize(e)),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        LocalStorage::set(Self::storage_key(key), value).map_err(|e| match e {
            StorageError::SerdeError(e) => StoreError::Serialize(e),
            other => StoreError::Storage(other.to_string()),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        LocalStorage::delete(Self::storage_key(key));
        Ok(())
    }
}
