// SPDX-License-Identifier: MIT

//! Shared test helpers: credential minting and record builders.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use shiftdesk_session::guard::Route;
use shiftdesk_session::models::{Identity, Role, Workplace};
use shiftdesk_session::monitor::Navigator;
use shiftdesk_session::services::{StoreRecord, UserRecord};
use std::sync::Mutex;

#[derive(Serialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Mint a signed, well-formed credential expiring `expires_in_secs` from
/// now (negative for an already-expired one).
#[allow(dead_code)]
pub fn mint_credential(username: &str, expires_in_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: now + expires_in_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"shiftdesk-test-secret"),
    )
    .expect("Failed to mint credential")
}

/// Build a three-segment token with an arbitrary JSON claims payload,
/// bypassing signing. Useful for malformed-claims cases.
#[allow(dead_code)]
pub fn raw_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

#[allow(dead_code)]
pub fn user_record(id: i64, username: &str, role: &str, store_id: Option<i64>) -> UserRecord {
    UserRecord {
        id,
        username: username.to_string(),
        email: Some(format!("{username}@example.com")),
        role: role.to_string(),
        active: true,
        profile_id: Some(id * 10),
        schedule_id: Some(id * 100),
        store_id,
    }
}

#[allow(dead_code)]
pub fn store_record(id: i64, name: &str) -> StoreRecord {
    StoreRecord {
        id,
        name: name.to_string(),
        address: "1 Main St".to_string(),
        latitude: 37.42,
        longitude: -122.08,
        radius: 150.0,
        break_duration: 30,
        max_break_count: 3,
        current_break_count: 0,
        late_penalty: 500,
        absence_penalty: 5000,
        overtime_multiplier: 1.5,
        active: true,
    }
}

#[allow(dead_code)]
pub fn identity(role: Role) -> Identity {
    Identity {
        id: 1,
        username: "casey".to_string(),
        email: Some("casey@example.com".to_string()),
        role,
        active: true,
        profile_id: Some(10),
        schedule_id: Some(100),
        workplace_id: Some(9),
    }
}

#[allow(dead_code)]
pub fn workplace(id: i64) -> Workplace {
    Workplace {
        id,
        name: format!("Workplace {id}"),
        address: "1 Main St".to_string(),
        latitude: 37.42,
        longitude: -122.08,
        radius_m: 150.0,
        break_duration_min: 30,
        max_break_count: 3,
        current_break_count: 0,
        late_penalty: 500,
        absence_penalty: 5000,
        overtime_multiplier: 1.5,
        active: true,
    }
}

/// Records replace-navigations issued by the monitor.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
