// SPDX-License-Identifier: MIT

//! Services module - external collaborators of the session core.

pub mod directory;

pub use directory::{DirectoryClient, StoreRecord, UserRecord};
