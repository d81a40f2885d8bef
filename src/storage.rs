// SPDX-License-Identifier: MIT

//! Persistent client storage for the credential and last-signed-in username.
//!
//! A small JSON key/value file that survives restarts. The two keys are
//! independent: expiry removes only the credential, while logout and
//! account-deletion teardown remove everything.

use crate::error::{Result, SessionError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const KEY_CREDENTIAL: &str = "credential";
const KEY_USERNAME: &str = "username";

/// File-backed key/value storage with an in-memory mode for tests.
pub struct SessionStorage {
    /// `None` in in-memory mode; nothing touches the filesystem.
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage {
    /// Open (or create) the session file at `path`.
    ///
    /// A corrupt file is discarded rather than propagated: the expiry
    /// monitor treats a missing credential as expired anyway, so starting
    /// empty degrades to a forced sign-in instead of a crash.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Corrupt session file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };
        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    /// Create in-memory storage for testing (offline mode).
    pub fn new_in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn credential(&self) -> Option<String> {
        self.get(KEY_CREDENTIAL)
    }

    pub fn set_credential(&self, credential: &str) -> Result<()> {
        self.put(KEY_CREDENTIAL, credential)
    }

    pub fn clear_credential(&self) -> Result<()> {
        self.remove(KEY_CREDENTIAL)
    }

    pub fn last_username(&self) -> Option<String> {
        self.get(KEY_USERNAME)
    }

    pub fn set_last_username(&self, username: &str) -> Result<()> {
        self.put(KEY_USERNAME, username)
    }

    /// Remove every key. Used by logout and account-deletion teardown.
    pub fn clear_all(&self) -> Result<()> {
        self.entries.lock().unwrap().clear();
        self.flush()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = {
            let entries = self.entries.lock().unwrap();
            serde_json::to_vec_pretty(&*entries)
                .map_err(|e| SessionError::Storage(e.to_string()))?
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| SessionError::Storage(e.to_string()))?;
            }
        }
        std::fs::write(path, bytes).map_err(|e| SessionError::Storage(e.to_string()))
    }
}
