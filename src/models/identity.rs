//! Identity and role models resolved from the directory backend.

use serde::{Deserialize, Serialize};

/// Role tags accepted by the console. The set is closed: any other wire
/// value is rejected during response mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Employee,
}

impl Role {
    /// Whether this role owns workplaces. Owners get the owned-workplace
    /// list resolved; other roles get at most their single workplace.
    pub fn manages_workplaces(&self) -> bool {
        matches!(self, Role::Owner)
    }

    /// Parse a wire role tag, returning `None` for anything outside the
    /// closed set.
    pub fn parse(tag: &str) -> Option<Role> {
        match tag {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// Resolved identity of the signed-in user.
///
/// Owned by the session store and refetched wholesale whenever the
/// credential changes; individual fields are never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub active: bool,
    /// Absent until onboarding completes.
    pub profile_id: Option<i64>,
    pub schedule_id: Option<i64>,
    /// Workplace this identity belongs to (non-owner roles).
    pub workplace_id: Option<i64>,
}

impl Identity {
    /// A missing profile means sign-up never finished; navigation should
    /// send the user to onboarding instead of the requested view.
    pub fn needs_onboarding(&self) -> bool {
        self.profile_id.is_none()
    }
}
