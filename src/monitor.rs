// SPDX-License-Identifier: MIT

//! Background credential expiry monitor.
//!
//! A two-state machine (`Watching` / `Expired`) ticked on a fixed cadence.
//! Expiry is fail-closed: an absent, truncated, or otherwise unparseable
//! persisted credential forces a logout rather than continued access.

use crate::error::Result;
use crate::guard::Route;
use crate::session::SessionStore;
use crate::storage::SessionStorage;
use crate::token;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Watching,
    Expired,
}

/// Sink for monitor-issued redirects. Implementations must replace the
/// current history entry so back-navigation cannot reach a stale
/// authenticated view.
pub trait Navigator {
    fn replace(&self, route: Route);
}

/// Watches the persisted credential and forces a clean logout on expiry.
pub struct ExpiryMonitor {
    storage: Arc<SessionStorage>,
    store: Arc<SessionStore>,
    state: Mutex<MonitorState>,
}

impl ExpiryMonitor {
    pub fn new(storage: Arc<SessionStorage>, store: Arc<SessionStore>) -> Self {
        Self {
            storage,
            store,
            state: Mutex::new(MonitorState::Watching),
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.state.lock().unwrap()
    }

    /// One expiry check.
    ///
    /// In `Watching`, evaluates the persisted credential; on expiry removes
    /// it, resets the session store, and transitions to `Expired`. Returns
    /// `true` exactly once per expiry and no-ops while `Expired`.
    pub fn tick(&self) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if *state == MonitorState::Expired {
            return Ok(false);
        }

        let credential = self.storage.credential();
        if !token::is_expired(credential.as_deref()) {
            return Ok(false);
        }

        tracing::info!("Credential expired; forcing logout");
        self.storage.clear_credential()?;
        self.store.clear();
        *state = MonitorState::Expired;
        Ok(true)
    }

    /// Consume the expired signal: re-arm the monitor so a later sign-in
    /// restarts it, and send the user to the landing route with replace
    /// semantics. Returns `false` when nothing was pending.
    pub fn acknowledge(&self, navigator: &dyn Navigator) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state != MonitorState::Expired {
            return false;
        }
        *state = MonitorState::Watching;
        navigator.replace(Route::Landing);
        true
    }

    /// Tick on a fixed cadence until expiry fires, then return.
    ///
    /// The return is the one-shot expired signal the presentation layer
    /// waits on; no further ticks run while `Expired`.
    pub async fn run(&self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if self.tick()? {
                return Ok(());
            }
        }
    }
}
