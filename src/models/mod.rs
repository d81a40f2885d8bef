// SPDX-License-Identifier: MIT

//! Data models for the session core.

pub mod identity;
pub mod workplace;

pub use identity::{Identity, Role};
pub use workplace::Workplace;
