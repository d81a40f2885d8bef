// SPDX-License-Identifier: MIT

//! Persistent session storage tests.

use shiftdesk_session::storage::SessionStorage;

#[test]
fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SessionStorage::open(dir.path().join("session.json")).unwrap();
    assert!(storage.credential().is_none());
    assert!(storage.last_username().is_none());
}

#[test]
fn keys_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let storage = SessionStorage::open(&path).unwrap();
        storage.set_credential("tok").unwrap();
        storage.set_last_username("casey").unwrap();
    }

    let storage = SessionStorage::open(&path).unwrap();
    assert_eq!(storage.credential().as_deref(), Some("tok"));
    assert_eq!(storage.last_username().as_deref(), Some("casey"));
}

#[test]
fn credential_and_username_are_independent_keys() {
    let storage = SessionStorage::new_in_memory();
    storage.set_credential("tok").unwrap();
    storage.set_last_username("casey").unwrap();

    // Expiry clears only the credential; the username survives so a
    // re-sign-in can pre-fill.
    storage.clear_credential().unwrap();
    assert!(storage.credential().is_none());
    assert_eq!(storage.last_username().as_deref(), Some("casey"));
}

#[test]
fn clear_all_removes_every_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let storage = SessionStorage::open(&path).unwrap();
    storage.set_credential("tok").unwrap();
    storage.set_last_username("casey").unwrap();
    storage.clear_all().unwrap();

    let storage = SessionStorage::open(&path).unwrap();
    assert!(storage.credential().is_none());
    assert!(storage.last_username().is_none());
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"{not json").unwrap();

    let storage = SessionStorage::open(&path).unwrap();
    assert!(storage.credential().is_none());
}

#[test]
fn parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/state/session.json");

    let storage = SessionStorage::open(&path).unwrap();
    storage.set_credential("tok").unwrap();
    assert!(path.exists());
}
