use effect_core::{KeyValueStore, StorageError};
use web_sys as web;

/// `window.localStorage`, looked up on every call so a storage that becomes
/// unavailable (private mode, quota) degrades to errors instead of panics.
#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

fn storage() -> Result<web::Storage, StorageError> {
    web::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        storage()?
            .get_item(key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}
