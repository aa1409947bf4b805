use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use gmail_connect::store::MemoryAccountStore;
use gmail_connect::{api, providers, AppState, Config, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gmail_connect=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    info!("gmail-connect v{}", env!("CARGO_PKG_VERSION"));
    info!("OAuth redirect URI: {}", config.redirect_uri);
    info!(
        "Client ID configured: {}, client secret configured: {}",
        !config.google_client_id.is_empty(),
        !config.google_client_secret.is_empty()
    );

    // Initialize components
    let provider = Arc::new(providers::google_from_config(&config));
    let store = Arc::new(MemoryAccountStore::new());

    let state: SharedState = Arc::new(
        AppState::new(config.clone(), store, provider).context("Failed to build app state")?,
    );

    // Build router
    let app = api::router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
