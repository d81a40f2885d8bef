// SPDX-License-Identifier: MIT

//! Credential codec: unverified claims decoding and expiry checks.
//!
//! The backend signs and verifies bearer tokens; the client only inspects
//! the claims segment to know when the session ends. Decoding therefore
//! skips signature validation entirely and fails closed: anything that
//! does not parse as a three-segment token with a numeric `exp` claim is
//! treated as already expired.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Issuers differ on padding, so accept both padded and unpadded base64url.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the claims segment of a compact three-part credential.
///
/// Returns `None` for anything malformed: wrong segment count, invalid
/// base64url, or a claims segment that is not a JSON object. Never panics
/// and never returns an error to the caller.
pub fn decode_claims(credential: &str) -> Option<Map<String, Value>> {
    let segments: Vec<&str> = credential.split('.').collect();
    if segments.len() != 3 {
        return None;
    }
    let bytes = CLAIMS_ENGINE.decode(segments[1]).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// Whether a credential is expired.
///
/// `true` for an absent credential, a failed decode, or a missing or
/// non-numeric `exp` claim; otherwise `true` iff the current time in
/// seconds has reached `exp`. Pure and side-effect-free: this is called
/// from both the guard path and the background expiry monitor.
pub fn is_expired(credential: Option<&str>) -> bool {
    let Some(credential) = credential else {
        return true;
    };
    let Some(claims) = decode_claims(credential) else {
        return true;
    };
    let Some(exp) = claims.get("exp").and_then(Value::as_f64) else {
        return true;
    };
    now_secs() >= exp
}

/// The expiry instant carried in the credential, if decodable.
pub fn expires_at(credential: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(credential)?;
    let exp = claims.get("exp").and_then(Value::as_f64)?;
    DateTime::from_timestamp(exp as i64, 0)
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
