// SPDX-License-Identifier: MIT

//! Session store and fetch orchestration.
//!
//! The store is the single shared object every component reads and writes:
//! the raw credential, the resolved identity, the selected workplace, the
//! owner's workplace list, and a UI layout flag. Mutators are synchronous
//! state transitions; identity and workplace resolution are async fetches
//! driven by explicit change events rather than ambient reactivity, so the
//! credential->identity and identity->workplace dependency graph is visible
//! and testable.
//!
//! Every fetch carries a request generation. A completing fetch commits its
//! result only if its generation is still the latest issued, and [`SessionStore::clear`]
//! bumps the generations, so a response landing after logout or expiry is
//! discarded instead of resurrecting state. Commits additionally require the
//! credential to still be present: a generation issued after a mid-flight
//! clear is current again, and without the credential check a follow-up
//! fetch could write into the emptied session.

use crate::error::{Result, SessionError};
use crate::models::{Identity, Role, Workplace};
use crate::services::{DirectoryClient, StoreRecord, UserRecord};
use crate::storage::SessionStorage;
use crate::token;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Identity resolution as a first-class value, so "credential present but
/// identity still loading" is distinguishable from "signed out".
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Resolving,
    Authenticated(Identity),
}

impl AuthState {
    /// The resolved identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Events emitted by session mutators for the owner of the session to
/// dispatch. Each fires at most once per state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The credential transitioned from absent to present; the identity
    /// must be (re)resolved.
    CredentialInstalled,
    /// An identity with the owner role was committed; the owned-workplace
    /// list must be resolved.
    OwnerResolved { username: String },
}

/// Outcome of a generation-checked identity commit.
///
/// The distinction matters to the orchestration: the single-workplace
/// follow-up fetch must not run when the identity it belongs to was
/// discarded, or it would re-populate a session cleared mid-flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCommit {
    /// Identity installed; carries the follow-up event for owner roles.
    Committed(Option<SessionEvent>),
    /// Superseded by a newer fetch, or the session was cleared mid-flight.
    Stale,
}

/// Consistent view of the session, taken fresh for every guard evaluation.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub credential: Option<String>,
    pub auth: AuthState,
    pub workplace: Option<Workplace>,
    pub owned_workplaces: Vec<Workplace>,
    pub sidebar_collapsed: bool,
}

#[derive(Default)]
struct SessionState {
    credential: Option<String>,
    auth: AuthState,
    workplace: Option<Workplace>,
    owned_workplaces: Vec<Workplace>,
    sidebar_collapsed: bool,
}

/// Shared session store.
///
/// The lock is never held across an await: fetches read what they need,
/// release, and later commit through generation-checked writes.
#[derive(Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
    identity_gen: AtomicU64,
    workplace_gen: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Mutators ────────────────────────────────────────────────

    /// Install or remove the raw credential.
    ///
    /// Returns [`SessionEvent::CredentialInstalled`] on an absent-to-present
    /// transition so the owner can trigger identity resolution. Removing the
    /// credential here does NOT clear derived fields; clearing sites must go
    /// through [`SessionStore::clear`] to uphold the invariant that no
    /// identity survives without a credential.
    pub fn set_credential(&self, credential: Option<String>) -> Option<SessionEvent> {
        let mut state = self.state.write().unwrap();
        let installed = state.credential.is_none() && credential.is_some();
        state.credential = credential;
        installed.then_some(SessionEvent::CredentialInstalled)
    }

    /// Replace the identity wholesale.
    ///
    /// Returns [`SessionEvent::OwnerResolved`] when the new identity carries
    /// the owner role, so the owned-workplace list gets resolved exactly
    /// once per identity change.
    pub fn set_identity(&self, identity: Option<Identity>) -> Option<SessionEvent> {
        let mut state = self.state.write().unwrap();
        Self::install_identity(&mut state, identity)
    }

    pub fn set_workplace(&self, workplace: Option<Workplace>) {
        self.state.write().unwrap().workplace = workplace;
    }

    pub fn set_owned_workplaces(&self, workplaces: Vec<Workplace>) {
        self.state.write().unwrap().owned_workplaces = workplaces;
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.state.write().unwrap().sidebar_collapsed = collapsed;
    }

    /// Mark the first identity resolution as in flight. A refresh keeps the
    /// previous identity visible until the new one commits.
    pub fn set_resolving(&self) {
        let mut state = self.state.write().unwrap();
        if !matches!(state.auth, AuthState::Authenticated(_)) {
            state.auth = AuthState::Resolving;
        }
    }

    /// Reset every field to its initial value in one transition and
    /// invalidate in-flight fetches so they cannot resurrect state later.
    ///
    /// This is the only way clearing sites (logout, expiry, account
    /// deletion) may drop the credential.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap();
        self.identity_gen.fetch_add(1, Ordering::SeqCst);
        self.workplace_gen.fetch_add(1, Ordering::SeqCst);
        *state = SessionState::default();
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Consistent snapshot for the route guard. Taken fresh on every
    /// navigation so an expiry-forced clear is observed immediately.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().unwrap();
        SessionSnapshot {
            credential: state.credential.clone(),
            auth: state.auth.clone(),
            workplace: state.workplace.clone(),
            owned_workplaces: state.owned_workplaces.clone(),
            sidebar_collapsed: state.sidebar_collapsed,
        }
    }

    pub fn credential(&self) -> Option<String> {
        self.state.read().unwrap().credential.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().unwrap().auth.identity().cloned()
    }

    // ─── Generation-checked commits ──────────────────────────────

    /// Issue a new identity fetch generation, invalidating older fetches.
    pub fn begin_identity_fetch(&self) -> u64 {
        self.identity_gen.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Issue a new workplace fetch generation, invalidating older fetches.
    pub fn begin_workplace_fetch(&self) -> u64 {
        self.workplace_gen.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a resolved identity if `gen` is still the latest issued and
    /// a credential is still present.
    pub fn commit_identity(&self, gen: u64, identity: Identity) -> IdentityCommit {
        let mut state = self.state.write().unwrap();
        if self.identity_gen.load(Ordering::SeqCst) != gen || state.credential.is_none() {
            tracing::debug!(username = %identity.username, "Discarding stale identity fetch");
            return IdentityCommit::Stale;
        }
        IdentityCommit::Committed(Self::install_identity(&mut state, Some(identity)))
    }

    /// Commit a resolved workplace if `gen` is still the latest issued and
    /// a credential is still present. No workplace may land in a signed-out
    /// session.
    pub fn commit_workplace(&self, gen: u64, workplace: Workplace) {
        let mut state = self.state.write().unwrap();
        if self.workplace_gen.load(Ordering::SeqCst) != gen || state.credential.is_none() {
            tracing::debug!(workplace_id = workplace.id, "Discarding stale workplace fetch");
            return;
        }
        state.workplace = Some(workplace);
    }

    /// Commit an owned-workplace list if `gen` is still the latest issued
    /// and a credential is still present, then reconcile the selection: a
    /// previously selected id found in the fresh list stays selected (same
    /// id, new object); otherwise the first element of a non-empty list
    /// becomes selected.
    pub fn commit_owned_workplaces(&self, gen: u64, workplaces: Vec<Workplace>) {
        let mut state = self.state.write().unwrap();
        if self.workplace_gen.load(Ordering::SeqCst) != gen || state.credential.is_none() {
            tracing::debug!("Discarding stale owned-workplace fetch");
            return;
        }
        let selected = state.workplace.as_ref().map(|w| w.id);
        state.owned_workplaces = workplaces;
        let selection = selected
            .and_then(|id| state.owned_workplaces.iter().find(|w| w.id == id))
            .or_else(|| state.owned_workplaces.first())
            .cloned();
        state.workplace = selection;
    }

    fn install_identity(
        state: &mut SessionState,
        identity: Option<Identity>,
    ) -> Option<SessionEvent> {
        match identity {
            Some(identity) => {
                let event = identity
                    .role
                    .manages_workplaces()
                    .then(|| SessionEvent::OwnerResolved {
                        username: identity.username.clone(),
                    });
                state.auth = AuthState::Authenticated(identity);
                event
            }
            None => {
                state.auth = AuthState::Unauthenticated;
                None
            }
        }
    }

    /// Roll an in-flight `Resolving` marker back after a failed first
    /// resolution; a failed refresh keeps the prior identity untouched.
    fn abandon_resolving(&self) {
        let mut state = self.state.write().unwrap();
        if matches!(state.auth, AuthState::Resolving) {
            state.auth = AuthState::Unauthenticated;
        }
    }
}

/// Explicitly constructed session context: the store plus the collaborators
/// fetch orchestration needs.
///
/// Built once at application start and handed to whatever needs identity;
/// there is no ambient global. The owner of the context is responsible for
/// its lifecycle: [`SessionContext::restore`] at startup,
/// [`SessionContext::logout`] at teardown.
pub struct SessionContext {
    store: Arc<SessionStore>,
    directory: DirectoryClient,
    storage: Arc<SessionStorage>,
}

impl SessionContext {
    pub fn new(
        store: Arc<SessionStore>,
        directory: DirectoryClient,
        storage: Arc<SessionStorage>,
    ) -> Self {
        Self {
            store,
            directory,
            storage,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn storage(&self) -> &Arc<SessionStorage> {
        &self.storage
    }

    /// Dispatch a session event, running follow-up events to completion.
    ///
    /// `CredentialInstalled` resolves the identity; an owner identity then
    /// emits `OwnerResolved`, which resolves the owned-workplace list.
    pub async fn dispatch(&self, event: SessionEvent) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            next = match event {
                SessionEvent::CredentialInstalled => self.resolve_identity().await,
                SessionEvent::OwnerResolved { username } => {
                    self.load_owned_workplaces(&username).await;
                    None
                }
            };
        }
    }

    /// Resolve the signed-in identity from the directory backend.
    ///
    /// Reads the persisted last-signed-in username, fetches the full user
    /// record, and commits it wholesale. Non-owner identities with an
    /// associated workplace also get that single workplace resolved.
    ///
    /// Transport failures are logged and leave prior state untouched;
    /// expiry is the only thing allowed to clear the credential.
    pub async fn resolve_identity(&self) -> Option<SessionEvent> {
        let Some(username) = self.storage.last_username() else {
            tracing::warn!("No persisted username; cannot resolve identity");
            return None;
        };
        let Some(credential) = self.store.credential() else {
            tracing::debug!("Credential removed before identity fetch started");
            return None;
        };

        self.store.set_resolving();
        let gen = self.store.begin_identity_fetch();

        let identity = match self.directory.get_user(&credential, &username).await {
            Ok(record) => match map_user(record) {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::error!(username = %username, error = %e, "Rejecting user record");
                    self.store.abandon_resolving();
                    return None;
                }
            },
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Identity fetch failed");
                self.store.abandon_resolving();
                return None;
            }
        };

        let workplace_id = (!identity.role.manages_workplaces())
            .then_some(identity.workplace_id)
            .flatten();
        let event = match self.store.commit_identity(gen, identity) {
            IdentityCommit::Committed(event) => event,
            // Logout or expiry landed while the fetch was in flight; the
            // workplace follow-up must not run against the cleared session.
            IdentityCommit::Stale => return None,
        };

        if let Some(id) = workplace_id {
            self.load_workplace(&credential, id).await;
        }
        event
    }

    /// Resolve the owned-workplace list for an owner identity.
    pub async fn load_owned_workplaces(&self, username: &str) {
        let Some(credential) = self.store.credential() else {
            return;
        };
        let gen = self.store.begin_workplace_fetch();
        match self.directory.get_owned_stores(&credential, username).await {
            Ok(records) => {
                let workplaces = records.into_iter().map(map_store).collect();
                self.store.commit_owned_workplaces(gen, workplaces);
            }
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Owned workplace fetch failed")
            }
        }
    }

    async fn load_workplace(&self, credential: &str, id: i64) {
        let gen = self.store.begin_workplace_fetch();
        match self.directory.get_store(credential, id).await {
            Ok(record) => self.store.commit_workplace(gen, map_store(record)),
            Err(e) => tracing::error!(workplace_id = id, error = %e, "Workplace fetch failed"),
        }
    }

    // ─── Bootstrap / teardown ────────────────────────────────────

    /// Install a freshly issued credential after sign-in.
    ///
    /// Persists both storage keys, installs the credential, and drives the
    /// resulting identity (and possibly workplace) resolution to completion.
    pub async fn sign_in(&self, credential: &str, username: &str) -> Result<()> {
        self.storage.set_last_username(username)?;
        self.storage.set_credential(credential)?;
        if let Some(event) = self.store.set_credential(Some(credential.to_string())) {
            self.dispatch(event).await;
        }
        Ok(())
    }

    /// Seed the session from persisted state at application start.
    ///
    /// An already-expired persisted credential is discarded rather than
    /// installed, so the app boots straight to the signed-out state.
    pub async fn restore(&self) -> Result<()> {
        let Some(credential) = self.storage.credential() else {
            return Ok(());
        };
        if token::is_expired(Some(&credential)) {
            tracing::info!("Persisted credential already expired; discarding");
            self.storage.clear_credential()?;
            return Ok(());
        }
        if let Some(at) = token::expires_at(&credential) {
            tracing::info!(expires_at = %at, "Restoring persisted session");
        }
        if let Some(event) = self.store.set_credential(Some(credential)) {
            self.dispatch(event).await;
        }
        Ok(())
    }

    /// Tear the session down: clear both storage keys and reset every
    /// store field. Also the final step after account-deletion confirmation.
    pub fn logout(&self) -> Result<()> {
        self.storage.clear_all()?;
        self.store.clear();
        Ok(())
    }
}

/// Map a wire user record into an identity, enforcing the closed role set.
fn map_user(record: UserRecord) -> Result<Identity> {
    let role = Role::parse(&record.role)
        .ok_or_else(|| SessionError::Directory(format!("unrecognized role tag: {}", record.role)))?;
    Ok(Identity {
        id: record.id,
        username: record.username,
        email: record.email,
        role,
        active: record.active,
        profile_id: record.profile_id,
        schedule_id: record.schedule_id,
        workplace_id: record.store_id,
    })
}

fn map_store(record: StoreRecord) -> Workplace {
    Workplace {
        id: record.id,
        name: record.name,
        address: record.address,
        latitude: record.latitude,
        longitude: record.longitude,
        radius_m: record.radius,
        break_duration_min: record.break_duration,
        max_break_count: record.max_break_count,
        current_break_count: record.current_break_count,
        late_penalty: record.late_penalty,
        absence_penalty: record.absence_penalty,
        overtime_multiplier: record.overtime_multiplier,
        active: record.active,
    }
}
