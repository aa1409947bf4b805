//! API route handlers.
//!
//! All handlers receive `SharedState` via Axum state extraction. Admin
//! handlers take an [`AdminSession`] extractor, so an invalid or missing
//! session cookie is rejected before the handler body runs.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::cookies::{clear_admin_cookie, set_admin_cookie};
use crate::auth::AdminSession;
use crate::connections;
use crate::error::AppError;
use crate::store::AccountSummary;
use crate::SharedState;

// =============================================================================
// Router
// =============================================================================

pub fn api_router(state: SharedState) -> Router {
    Router::new()
        // ── Health ───────────────────────────────────────────────────────
        .route("/status", get(status))
        // ── OAuth ────────────────────────────────────────────────────────
        .route("/auth/gmail/url", get(gmail_auth_url))
        .route("/auth/gmail/callback", post(gmail_callback))
        .route("/auth/status", get(connection_status))
        // ── Admin ────────────────────────────────────────────────────────
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/users/{id}/sync", post(admin_sync_user))
        .route("/admin/users/{id}", delete(admin_revoke_user))
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

async fn status() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gmail-connect",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// OAuth Endpoints
// =============================================================================

/// GET /api/auth/gmail/url: Authorization URL for connecting Gmail.
async fn gmail_auth_url(
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let url = connections::authorization_url(&state)?;
    tracing::debug!("Generated auth URL: {url}");
    Ok(Json(json!({ "url": url })))
}

#[derive(Deserialize)]
struct CallbackBody {
    #[serde(default)]
    code: String,
    state: Option<String>,
}

/// POST /api/auth/gmail/callback: Complete the OAuth flow.
async fn gmail_callback(
    State(state): State<SharedState>,
    body: Result<Json<CallbackBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body?;
    let user =
        connections::complete_authorization(&state, &body.code, body.state.as_deref()).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

#[derive(Deserialize)]
struct StatusQuery {
    email: Option<String>,
}

/// GET /api/auth/status?email=: Whether an email has a connected account.
async fn connection_status(
    State(state): State<SharedState>,
    Query(q): Query<StatusQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = q.email.unwrap_or_default();
    let status = connections::connection_status(&state, &email).await?;

    let body = match status {
        None => json!({ "connected": false }),
        Some(AccountSummary {
            email,
            name,
            picture,
            connected_at,
            expiry_date,
            last_synced,
            ..
        }) => json!({
            "connected": true,
            "name": name,
            "email": email,
            "picture": picture,
            "connectedAt": connected_at,
            "expiryDate": expiry_date,
            "lastSynced": last_synced,
        }),
    };

    Ok(Json(body))
}

// =============================================================================
// Admin Endpoints
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    #[serde(default)]
    secret_key: String,
}

/// POST /api/admin/login: Exchange the shared secret for a session cookie.
async fn admin_login(
    State(state): State<SharedState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    if !state
        .crypto
        .secrets_match(&body.secret_key, &state.config.admin_secret_key)
    {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::InvalidSecret);
    }

    let session = state.sessions.issue()?;
    let mut headers = HeaderMap::new();
    set_admin_cookie(
        &mut headers,
        &session.token,
        session.max_age_secs,
        state.config.cookie_secure,
    );

    tracing::info!("Admin session issued");
    Ok((headers, Json(json!({ "success": true }))))
}

/// POST /api/admin/logout: Clear the session cookie.
async fn admin_logout(
    State(state): State<SharedState>,
    admin: AdminSession,
) -> impl IntoResponse {
    tracing::info!("Admin session for {} logged out", admin.claims.sub);
    let mut headers = HeaderMap::new();
    clear_admin_cookie(&mut headers, state.config.cookie_secure);
    (headers, Json(json!({ "success": true })))
}

/// GET /api/admin/users: All connected accounts, without tokens.
async fn admin_list_users(
    State(state): State<SharedState>,
    _admin: AdminSession,
) -> Result<Json<serde_json::Value>, AppError> {
    let users: Vec<AccountSummary> = state
        .store
        .list()
        .await?
        .iter()
        .map(|acct| acct.summary())
        .collect();

    Ok(Json(json!({ "users": users })))
}

/// POST /api/admin/users/{id}/sync: Refresh if needed and count messages.
async fn admin_sync_user(
    State(state): State<SharedState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let report = connections::sync_account(&state, &id).await?;

    Ok(Json(json!({
        "success": true,
        "messageCount": report.message_count,
        "lastSynced": report.last_synced,
    })))
}

/// DELETE /api/admin/users/{id}: Revoke and remove an account.
///
/// Succeeds even when the account is already gone or the provider refuses
/// the revocation.
async fn admin_revoke_user(
    State(state): State<SharedState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = connections::revoke_account(&state, &id).await?;

    let body = match outcome.warning() {
        Some(warning) => json!({ "success": true, "warning": warning }),
        None => json!({ "success": true }),
    };
    Ok(Json(body))
}
