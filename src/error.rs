use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for the gmail-connect service.
///
/// The `Display` text carries upstream detail for logs. What reaches the
/// client is [`AppError::public_message`], which never includes provider
/// internals.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Validation / lookup ─────────────────────────────────────────────
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid state parameter")]
    InvalidState,

    #[error("{0} not found")]
    NotFound(String),

    // ── Admin auth ──────────────────────────────────────────────────────
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid secret key")]
    InvalidSecret,

    // ── Upstream ────────────────────────────────────────────────────────
    #[error("Gmail authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Gmail sync failed: {0}")]
    SyncFailed(String),

    #[error("OAuth provider error: {0}")]
    Provider(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    // ── Internal ────────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and machine-readable code for the response body.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::InvalidState => (StatusCode::BAD_REQUEST, "invalid_state"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::InvalidSecret => (StatusCode::UNAUTHORIZED, "invalid_secret"),
            AppError::AuthenticationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "authentication_failed")
            }
            AppError::SyncFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "sync_failed"),
            AppError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            AppError::RefreshFailed(_) => (StatusCode::BAD_GATEWAY, "refresh_failed"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Message safe to return to a client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InvalidState
            | AppError::NotFound(_)
            | AppError::Unauthorized
            | AppError::InvalidSecret => {
                self.to_string()
            }
            AppError::AuthenticationFailed(_) => "Failed to authenticate with Gmail".into(),
            AppError::SyncFailed(_) => "Failed to sync with Gmail".into(),
            AppError::Provider(_) | AppError::RefreshFailed(_) => {
                "Upstream provider error".into()
            }
            AppError::Internal(_) => "Internal server error".into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("session token error: {e}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let body = json!({
            "success": false,
            "error": self.public_message(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
