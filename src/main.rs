// SPDX-License-Identifier: MIT

//! ShiftDesk session agent
//!
//! Headless driver of the session lifecycle: restores a persisted
//! credential, resolves identity and workplace state, then watches for
//! credential expiry until the session ends.

use shiftdesk_session::{
    config::Config, services::DirectoryClient, ExpiryMonitor, Navigator, Route, SessionContext,
    SessionStorage, SessionStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logs redirects instead of driving a UI router.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn replace(&self, route: Route) {
        tracing::info!(?route, "Replace-navigation");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api = %config.api_base_url, "Starting ShiftDesk session agent");

    let storage = Arc::new(SessionStorage::open(&config.session_file)?);
    let store = Arc::new(SessionStore::new());
    let directory = DirectoryClient::new(config.api_base_url.clone());
    let context = SessionContext::new(store.clone(), directory, storage.clone());

    context.restore().await?;
    match store.identity() {
        Some(identity) => {
            tracing::info!(username = %identity.username, role = ?identity.role, "Session restored");
            if identity.needs_onboarding() {
                // Sign-up never finished; the console routes to onboarding
                // before any guarded view.
                LogNavigator.replace(Route::Onboarding);
            }
        }
        None => {
            tracing::info!("No valid persisted session; sign in required");
            return Ok(());
        }
    }

    // The monitor is the only background mutator of session state; run()
    // returns when the credential expires.
    let monitor = ExpiryMonitor::new(storage, store);
    monitor.run(config.expiry_check_interval).await?;

    monitor.acknowledge(&LogNavigator);
    tracing::info!("Session expired; agent exiting");
    Ok(())
}

fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shiftdesk_session=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
