// SPDX-License-Identifier: MIT

//! Error types for the session core.
//!
//! Failures at this layer are diagnostics, not user-facing errors: fetch
//! paths log and leave prior session state untouched, and expiry detection
//! is the only failure that mutates state.

/// Session core error type.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Directory API error: {0}")]
    Directory(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for the session core
pub type Result<T> = std::result::Result<T, SessionError>;
