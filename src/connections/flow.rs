//! OAuth exchange flow: authorization URL → code exchange → profile → store.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::error::AppError;
use crate::store::{AccountSummary, ConnectedAccount};
use crate::AppState;

/// Minimal identity returned after a successful connect. Never carries tokens.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectedUser {
    pub email: String,
    pub name: String,
}

/// Build the Google authorization URL with a freshly signed state.
pub fn authorization_url(state: &AppState) -> Result<String, AppError> {
    let signed_state = state.crypto.issue_state(Utc::now().timestamp())?;
    Ok(state.provider.auth_url(&signed_state))
}

/// Complete the flow for an authorization `code`.
///
/// `oauth_state`, when present, must be a valid state issued by
/// [`authorization_url`]. Exchange and profile failures collapse into
/// `AuthenticationFailed`; the user restarts from the authorization URL.
pub async fn complete_authorization(
    state: &AppState,
    code: &str,
    oauth_state: Option<&str>,
) -> Result<ConnectedUser, AppError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Authorization code is required".into()));
    }

    if let Some(signed) = oauth_state.filter(|s| !s.is_empty()) {
        state
            .crypto
            .check_state(signed, Utc::now().timestamp())
            .map_err(|_| AppError::BadRequest("Invalid or expired state parameter".into()))?;
    }

    let tokens = state.provider.exchange_code(code).await.map_err(|e| {
        error!("OAuth callback error: {e}");
        AppError::AuthenticationFailed(e.to_string())
    })?;

    let profile = state
        .provider
        .fetch_profile(&tokens.access_token)
        .await
        .map_err(|e| {
            error!("Profile fetch error: {e}");
            AppError::AuthenticationFailed(e.to_string())
        })?;

    let account =
        ConnectedAccount::from_exchange(profile, tokens, state.provider.token_ttl(), Utc::now());
    let stored = state.store.upsert(account).await?;

    info!("Connected Gmail account {} ({})", stored.email, stored.id);

    Ok(ConnectedUser {
        email: stored.email,
        name: stored.name,
    })
}

/// Connection status for an email address. `None` when not connected.
pub async fn connection_status(
    state: &AppState,
    email: &str,
) -> Result<Option<AccountSummary>, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }

    Ok(state
        .store
        .find_by_email(email)
        .await?
        .map(|acct| acct.summary()))
}
