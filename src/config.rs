//! Agent configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the directory/attendance backend.
    pub api_base_url: String,
    /// Path of the persisted session file.
    pub session_file: String,
    /// Expiry monitor cadence.
    pub expiry_check_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("SHIFTDESK_API_URL")
                .map_err(|_| ConfigError::Missing("SHIFTDESK_API_URL"))?,
            session_file: env::var("SHIFTDESK_SESSION_FILE")
                .unwrap_or_else(|_| ".shiftdesk/session.json".to_string()),
            expiry_check_interval: Duration::from_millis(
                env::var("SHIFTDESK_EXPIRY_CHECK_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            ),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            session_file: ".shiftdesk/session.json".to_string(),
            expiry_check_interval: Duration::from_millis(1000),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
