//! Device-orientation permission flag and its key-value persistence.
//!
//! The stored flag is only a hint: any storage failure reads as
//! [`PermissionFlag::Unknown`], which means "ask again".

use crate::error::StorageError;
use fnv::FnvHashMap;

pub const PERMISSION_KEY: &str = "orientation-permission";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionFlag {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionFlag {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            PermissionFlag::Unknown => None,
            PermissionFlag::Granted => Some("granted"),
            PermissionFlag::Denied => Some("denied"),
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "granted" => PermissionFlag::Granted,
            "denied" => PermissionFlag::Denied,
            _ => PermissionFlag::Unknown,
        }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used when the host has no persistent storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FnvHashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and writes the flag, swallowing storage errors.
pub struct PermissionStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PermissionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> PermissionFlag {
        match self.store.get(PERMISSION_KEY) {
            Ok(Some(raw)) => PermissionFlag::parse(&raw),
            Ok(None) => PermissionFlag::Unknown,
            Err(e) => {
                log::debug!("[orientation] permission flag unreadable: {}", e);
                PermissionFlag::Unknown
            }
        }
    }

    /// Persist an explicit user decision. `Unknown` clears the flag.
    pub fn record(&mut self, flag: PermissionFlag) {
        let result = match flag.as_str() {
            Some(value) => self.store.set(PERMISSION_KEY, value),
            None => self.store.remove(PERMISSION_KEY),
        };
        if let Err(e) = result {
            log::debug!("[orientation] permission flag not stored: {}", e);
        }
    }

    pub fn forget(&mut self) {
        self.record(PermissionFlag::Unknown);
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// What the host should do about orientation input at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientationAccess {
    /// Platform needs no permission; listen right away.
    Enabled,
    /// Previously granted; request silently on the next user gesture.
    RequestOnGesture,
    /// Never asked (or unreadable); show the prompt.
    Prompt,
    /// Previously denied; do not ask again.
    Disabled,
}

impl OrientationAccess {
    pub fn decide(requires_gesture: bool, flag: PermissionFlag) -> Self {
        if !requires_gesture {
            return OrientationAccess::Enabled;
        }
        match flag {
            PermissionFlag::Granted => OrientationAccess::RequestOnGesture,
            PermissionFlag::Denied => OrientationAccess::Disabled,
            PermissionFlag::Unknown => OrientationAccess::Prompt,
        }
    }
}
