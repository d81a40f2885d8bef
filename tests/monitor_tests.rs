// SPDX-License-Identifier: MIT

//! Expiry monitor state machine tests.

mod common;

use common::RecordingNavigator;
use shiftdesk_session::guard::Route;
use shiftdesk_session::monitor::{ExpiryMonitor, MonitorState};
use shiftdesk_session::session::{AuthState, SessionStore};
use shiftdesk_session::storage::SessionStorage;
use std::sync::Arc;

fn seeded(credential: Option<&str>) -> (Arc<SessionStorage>, Arc<SessionStore>, ExpiryMonitor) {
    let storage = Arc::new(SessionStorage::new_in_memory());
    let store = Arc::new(SessionStore::new());
    if let Some(credential) = credential {
        storage.set_credential(credential).unwrap();
        store.set_credential(Some(credential.to_string()));
    }
    let monitor = ExpiryMonitor::new(storage.clone(), store.clone());
    (storage, store, monitor)
}

#[test]
fn expired_credential_forces_cleanup_on_one_tick() {
    let credential = common::mint_credential("casey", -1);
    let (storage, store, monitor) = seeded(Some(&credential));

    assert!(monitor.tick().unwrap());

    assert!(storage.credential().is_none());
    let session = store.snapshot();
    assert!(session.credential.is_none());
    assert!(matches!(session.auth, AuthState::Unauthenticated));
    assert!(session.owned_workplaces.is_empty());
    assert_eq!(monitor.state(), MonitorState::Expired);
}

#[test]
fn no_further_ticks_while_expired() {
    let credential = common::mint_credential("casey", -1);
    let (storage, _store, monitor) = seeded(Some(&credential));

    assert!(monitor.tick().unwrap());
    // Re-seed storage to prove the expired monitor no longer touches it.
    storage.set_credential(&credential).unwrap();
    assert!(!monitor.tick().unwrap());
    assert!(storage.credential().is_some());
}

#[test]
fn valid_credential_keeps_watching() {
    let credential = common::mint_credential("casey", 3600);
    let (storage, _store, monitor) = seeded(Some(&credential));

    assert!(!monitor.tick().unwrap());
    assert_eq!(monitor.state(), MonitorState::Watching);
    assert!(storage.credential().is_some());
}

#[test]
fn unparseable_credential_fails_closed() {
    let (storage, _store, monitor) = seeded(Some("corrupted-garbage"));

    assert!(monitor.tick().unwrap());
    assert!(storage.credential().is_none());
    assert_eq!(monitor.state(), MonitorState::Expired);
}

#[test]
fn acknowledge_rearms_and_replaces_to_landing() {
    let credential = common::mint_credential("casey", -1);
    let (_storage, _store, monitor) = seeded(Some(&credential));
    monitor.tick().unwrap();

    let navigator = RecordingNavigator::default();
    assert!(monitor.acknowledge(&navigator));

    assert_eq!(monitor.state(), MonitorState::Watching);
    assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Landing]);

    // Nothing pending: no second navigation.
    assert!(!monitor.acknowledge(&navigator));
    assert_eq!(navigator.routes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn run_returns_when_expiry_fires() {
    let credential = common::mint_credential("casey", -1);
    let (storage, _store, monitor) = seeded(Some(&credential));

    monitor
        .run(std::time::Duration::from_millis(5))
        .await
        .unwrap();

    assert_eq!(monitor.state(), MonitorState::Expired);
    assert!(storage.credential().is_none());
}
