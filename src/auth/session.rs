//! Admin sessions: shared-secret login and HS256 session tokens.
//!
//! A successful login yields a short-lived JWT carried in the `admin_token`
//! cookie. Every admin route extracts [`AdminSession`], which rejects
//! missing, malformed, expired and wrongly-signed tokens with the same
//! `Unauthorized` error.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::cookies::{get_cookie_value, ADMIN_COOKIE};
use crate::error::AppError;
use crate::SharedState;

const ADMIN_ROLE: &str = "admin";

/// Claims carried by an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies admin session tokens.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub max_age_secs: i64,
}

impl SessionManager {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token valid for the configured window starting at `now_ts`.
    pub fn issue_at(&self, now_ts: i64) -> Result<IssuedSession, AppError> {
        let claims = AdminClaims {
            sub: ADMIN_ROLE.into(),
            role: ADMIN_ROLE.into(),
            iat: now_ts,
            exp: now_ts + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedSession {
            token,
            max_age_secs: self.ttl_secs,
        })
    }

    pub fn issue(&self) -> Result<IssuedSession, AppError> {
        self.issue_at(Utc::now().timestamp())
    }

    /// Verify a session token. All failure causes collapse to `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = decode::<AdminClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected admin session: {e}");
            AppError::Unauthorized
        })?;

        if data.claims.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized);
        }

        Ok(data.claims)
    }
}

/// Extractor proving the request carries a valid admin session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: AdminClaims,
}

impl FromRequestParts<SharedState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = get_cookie_value(&parts.headers, ADMIN_COOKIE).ok_or(AppError::Unauthorized)?;
        let claims = state.sessions.verify(&token)?;
        Ok(AdminSession { claims })
    }
}
