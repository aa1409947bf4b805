use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AppError;

/// A set of tokens returned from the provider after code exchange or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Basic profile of the account that granted access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub picture: Option<String>,
}

/// One page of a mailbox listing. Only the ids are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePage {
    pub message_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Everything the service needs from Google: OAuth plus one mailbox call.
///
/// The production implementation talks HTTP; tests swap in a fake.
#[async_trait]
pub trait GmailProvider: Send + Sync {
    /// Build the authorization URL the user is sent to.
    ///
    /// `state` is an opaque, HMAC-signed value echoed back on callback.
    fn auth_url(&self, state: &str) -> String;

    /// Exchange an authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError>;

    /// Refresh an expired access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet, AppError>;

    /// Fetch the profile of the account owning `access_token`.
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, AppError>;

    /// List up to `max_results` messages in the mailbox.
    async fn list_messages(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<MessagePage, AppError>;

    /// Revoke an access or refresh token.
    async fn revoke(&self, token: &str) -> Result<(), AppError>;

    /// Token lifetime assumed when the provider omits `expires_in`.
    fn token_ttl(&self) -> Duration {
        Duration::from_secs(3600)
    }
}
