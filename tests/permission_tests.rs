// Host-side tests for the orientation permission flag.

use effect_core::{
    KeyValueStore, MemoryStore, OrientationAccess, PermissionFlag, PermissionStore, StorageError,
    PERMISSION_KEY,
};

/// Storage that refuses everything, like a private-mode browser.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Rejected("quota".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[test]
fn decisions_round_trip_through_the_store() {
    let mut store = PermissionStore::new(MemoryStore::default());
    assert_eq!(store.load(), PermissionFlag::Unknown);

    store.record(PermissionFlag::Granted);
    assert_eq!(store.load(), PermissionFlag::Granted);
    store.record(PermissionFlag::Denied);
    assert_eq!(store.load(), PermissionFlag::Denied);

    store.forget();
    assert_eq!(store.load(), PermissionFlag::Unknown);
    let inner = store.into_inner();
    assert_eq!(inner.get(PERMISSION_KEY), Ok(None));
}

#[test]
fn stored_value_is_the_plain_word() {
    let mut store = PermissionStore::new(MemoryStore::default());
    store.record(PermissionFlag::Granted);
    let inner = store.into_inner();
    assert_eq!(inner.get(PERMISSION_KEY), Ok(Some("granted".to_string())));
}

#[test]
fn broken_storage_reads_as_unknown() {
    let mut store = PermissionStore::new(BrokenStore);
    store.record(PermissionFlag::Granted);
    assert_eq!(store.load(), PermissionFlag::Unknown);
}

#[test]
fn unrecognised_values_read_as_unknown() {
    assert_eq!(PermissionFlag::parse("granted"), PermissionFlag::Granted);
    assert_eq!(PermissionFlag::parse(" denied\n"), PermissionFlag::Denied);
    assert_eq!(PermissionFlag::parse("yes"), PermissionFlag::Unknown);
    assert_eq!(PermissionFlag::parse(""), PermissionFlag::Unknown);
}

#[test]
fn access_decision_matrix() {
    use OrientationAccess::*;
    use PermissionFlag::*;
    for flag in [Unknown, Granted, Denied] {
        assert_eq!(OrientationAccess::decide(false, flag), Enabled);
    }
    assert_eq!(OrientationAccess::decide(true, Granted), RequestOnGesture);
    assert_eq!(OrientationAccess::decide(true, Denied), Disabled);
    assert_eq!(OrientationAccess::decide(true, Unknown), Prompt);
}
