// SPDX-License-Identifier: MIT

//! ShiftDesk session core
//!
//! Client-side session and authorization lifecycle for the ShiftDesk
//! attendance console: establishing identity from a bearer credential,
//! keeping its validity synchronized with a background expiry monitor,
//! resolving the identity -> workplace data dependency, and gating
//! navigation by role and workplace ownership.

pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod monitor;
pub mod services;
pub mod session;
pub mod storage;
pub mod token;

pub use guard::{Route, RouteDecision};
pub use monitor::{ExpiryMonitor, MonitorState, Navigator};
pub use session::{
    AuthState, IdentityCommit, SessionContext, SessionEvent, SessionSnapshot, SessionStore,
};
pub use storage::SessionStorage;
