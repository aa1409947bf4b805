pub mod api;
pub mod auth;
pub mod config;
pub mod connections;
pub mod crypto;
pub mod error;
pub mod providers;
pub mod store;

pub use config::Config;
pub use error::AppError;

use std::sync::Arc;

/// Shared application state passed to all API handlers.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn store::AccountStore>,
    pub provider: Arc<dyn providers::GmailProvider>,
    pub crypto: crypto::CryptoEngine,
    pub sessions: auth::SessionManager,
}

impl AppState {
    /// Wire up state from config plus the injected store and provider.
    pub fn new(
        config: Config,
        store: Arc<dyn store::AccountStore>,
        provider: Arc<dyn providers::GmailProvider>,
    ) -> Result<Self, AppError> {
        let crypto = crypto::CryptoEngine::new(&config.jwt_secret)?;
        let sessions = auth::SessionManager::new(&config.jwt_secret, config.admin_session_ttl_secs);

        Ok(Self {
            config,
            store,
            provider,
            crypto,
            sessions,
        })
    }
}

pub type SharedState = Arc<AppState>;
