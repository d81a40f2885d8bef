// SPDX-License-Identifier: MIT

//! Directory backend client for identity and workplace lookups.
//!
//! Consumes three endpoints:
//! - `GET /user/{username}` - full user record
//! - `GET /store/{id}` - a single workplace
//! - `GET /store/owned/{username}` - workplaces owned by a user
//!
//! Failures here surface to callers as [`SessionError::Directory`], which
//! the session orchestration logs and swallows: a fetch that fails leaves
//! prior session state untouched.

use crate::error::SessionError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Wire record for `GET /user/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw role tag; mapped into the closed role set by the session store.
    pub role: String,
    pub active: bool,
    #[serde(default)]
    pub profile_id: Option<i64>,
    #[serde(default)]
    pub schedule_id: Option<i64>,
    /// Workplace the user belongs to (the backend calls workplaces stores).
    #[serde(default)]
    pub store_id: Option<i64>,
}

/// Wire record for the `/store` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub break_duration: u32,
    pub max_break_count: u32,
    #[serde(default)]
    pub current_break_count: u32,
    pub late_penalty: i64,
    pub absence_penalty: i64,
    pub overtime_multiplier: f64,
    pub active: bool,
}

/// Directory API client.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    mock: Option<MockDirectory>,
}

/// Canned records served in offline mode.
#[derive(Default)]
struct MockDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
    stores: Mutex<HashMap<i64, StoreRecord>>,
    owned: Mutex<HashMap<String, Vec<StoreRecord>>>,
    fail: AtomicBool,
}

impl DirectoryClient {
    /// Create a client against the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            mock: None,
        }
    }

    /// Create an offline client for testing: requests are served from
    /// canned records and never touch the network.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: String::new(),
            mock: Some(MockDirectory::default()),
        }
    }

    /// Insert a canned user record (offline mode only).
    pub fn mock_insert_user(&self, record: UserRecord) {
        if let Some(mock) = &self.mock {
            mock.users
                .lock()
                .unwrap()
                .insert(record.username.clone(), record);
        }
    }

    /// Insert a canned workplace record (offline mode only).
    pub fn mock_insert_store(&self, record: StoreRecord) {
        if let Some(mock) = &self.mock {
            mock.stores.lock().unwrap().insert(record.id, record);
        }
    }

    /// Set the canned owned-workplace list for a username (offline mode only).
    pub fn mock_set_owned(&self, username: &str, stores: Vec<StoreRecord>) {
        if let Some(mock) = &self.mock {
            mock.owned
                .lock()
                .unwrap()
                .insert(username.to_string(), stores);
        }
    }

    /// Make every request fail with a transport error (offline mode only).
    pub fn mock_set_failing(&self, failing: bool) {
        if let Some(mock) = &self.mock {
            mock.fail.store(failing, Ordering::SeqCst);
        }
    }

    /// Fetch the full user record for `username`.
    pub async fn get_user(
        &self,
        credential: &str,
        username: &str,
    ) -> Result<UserRecord, SessionError> {
        if let Some(mock) = &self.mock {
            return mock.user(username);
        }
        let url = format!("{}/user/{}", self.base_url, username);
        self.get_json(&url, credential).await
    }

    /// Fetch a single workplace by id.
    pub async fn get_store(&self, credential: &str, id: i64) -> Result<StoreRecord, SessionError> {
        if let Some(mock) = &self.mock {
            return mock.store(id);
        }
        let url = format!("{}/store/{}", self.base_url, id);
        self.get_json(&url, credential).await
    }

    /// Fetch the workplaces owned by `username`.
    pub async fn get_owned_stores(
        &self,
        credential: &str,
        username: &str,
    ) -> Result<Vec<StoreRecord>, SessionError> {
        if let Some(mock) = &self.mock {
            return mock.owned(username);
        }
        let url = format!("{}/store/owned/{}", self.base_url, username);
        self.get_json(&url, credential).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: &str,
    ) -> Result<T, SessionError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| SessionError::Directory(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Directory(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| SessionError::Directory(e.to_string()))
    }
}

impl MockDirectory {
    fn check_fail(&self) -> Result<(), SessionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Directory(
                "connection refused (mock)".to_string(),
            ));
        }
        Ok(())
    }

    fn user(&self, username: &str) -> Result<UserRecord, SessionError> {
        self.check_fail()?;
        self.users
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| SessionError::Directory(format!("HTTP 404: user {} not found", username)))
    }

    fn store(&self, id: i64) -> Result<StoreRecord, SessionError> {
        self.check_fail()?;
        self.stores
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| SessionError::Directory(format!("HTTP 404: store {} not found", id)))
    }

    fn owned(&self, username: &str) -> Result<Vec<StoreRecord>, SessionError> {
        self.check_fail()?;
        Ok(self
            .owned
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }
}
