// SPDX-License-Identifier: MIT

//! Route guard: per-navigation authorization decisions.
//!
//! A pure decision function over a session snapshot. The caller re-evaluates
//! on every navigation and after every session change; decisions are never
//! cached, so a clear forced by the expiry monitor is observed on the very
//! next evaluation.

use crate::models::Role;
use crate::session::{AuthState, SessionSnapshot};

/// Navigation targets the session core can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    AccessDenied,
    Landing,
    Onboarding,
}

/// Outcome of evaluating a protected navigation.
///
/// `Pending` renders nothing while identity resolution is in flight; a
/// redirect at that point would race the fetch and flash the sign-in
/// screen. Redirects use replace semantics (no new history entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Pending,
    Redirect(Route),
}

/// Decide whether the current session may render a view restricted to
/// `required_roles`, optionally scoped to a workplace id embedded in the
/// path.
pub fn evaluate(
    session: &SessionSnapshot,
    required_roles: &[Role],
    path_workplace_id: Option<i64>,
) -> RouteDecision {
    // Absence of a credential dominates everything, including a stale
    // identity object still sitting in the snapshot.
    if session.credential.is_none() {
        return RouteDecision::Redirect(Route::SignIn);
    }

    let identity = match &session.auth {
        AuthState::Authenticated(identity) => identity,
        _ => return RouteDecision::Pending,
    };

    if !required_roles.contains(&identity.role) {
        return RouteDecision::Redirect(Route::AccessDenied);
    }

    // A path-scoped workplace id must match the selected workplace, so a
    // member of workplace A cannot open workplace B's views by editing the
    // id in the URL.
    if let (Some(path_id), Some(workplace)) = (path_workplace_id, &session.workplace) {
        if workplace.id != path_id {
            return RouteDecision::Redirect(Route::AccessDenied);
        }
    }

    RouteDecision::Render
}
