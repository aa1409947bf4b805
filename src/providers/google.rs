use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::traits::{GmailProvider, MessagePage, Profile, TokenSet};
use crate::error::AppError;

/// Scopes requested on connect: read-only mailbox plus basic profile.
pub const GMAIL_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs of the Google endpoints used by [`GoogleProvider`].
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub revoke: String,
    pub userinfo: String,
    pub gmail: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token: "https://oauth2.googleapis.com/token".into(),
            revoke: "https://oauth2.googleapis.com/revoke".into(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".into(),
            gmail: "https://gmail.googleapis.com/gmail/v1".into(),
        }
    }
}

/// Google OAuth 2.0 + Gmail API provider.
///
/// Token lifetime: 1 hour.
/// Refresh: requires `access_type=offline` and `prompt=consent` on connect.
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: GoogleEndpoints,
    http: reqwest::Client,
}

// Raw token response from Google's token endpoint
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl From<GoogleTokenResponse> for TokenSet {
    fn from(resp: GoogleTokenResponse) -> Self {
        TokenSet {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_in: resp.expires_in,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

impl GoogleProvider {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self::with_endpoints(client_id, client_secret, redirect_uri, GoogleEndpoints::default())
    }

    pub fn with_endpoints(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        endpoints: GoogleEndpoints,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client_id,
            client_secret,
            redirect_uri,
            endpoints,
            http,
        }
    }

    async fn post_token_form(
        &self,
        form: &[(&str, &str)],
        what: &str,
    ) -> Result<GoogleTokenResponse, String> {
        let resp = self
            .http
            .post(&self.endpoints.token)
            .form(form)
            .send()
            .await
            .map_err(|e| format!("{what} request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Google {what} failed ({status}): {body}"));
        }

        resp.json()
            .await
            .map_err(|e| format!("Failed to parse {what} response: {e}"))
    }
}

#[async_trait]
impl GmailProvider for GoogleProvider {
    fn auth_url(&self, state: &str) -> String {
        let scope_str = GMAIL_SCOPES.join(" ");
        format!(
            "{base}?\
             client_id={client_id}\
             &redirect_uri={redirect_uri}\
             &response_type=code\
             &scope={scope}\
             &state={state}\
             &access_type=offline\
             &prompt=consent\
             &include_granted_scopes=true",
            base = self.endpoints.authorize,
            client_id = urlencoding(&self.client_id),
            redirect_uri = urlencoding(&self.redirect_uri),
            scope = urlencoding(&scope_str),
            state = urlencoding(state),
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError> {
        self.post_token_form(
            &[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ],
            "token exchange",
        )
        .await
        .map(TokenSet::from)
        .map_err(AppError::Provider)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet, AppError> {
        // Google doesn't always return a new refresh token on refresh
        self.post_token_form(
            &[
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ],
            "refresh",
        )
        .await
        .map(TokenSet::from)
        .map_err(AppError::RefreshFailed)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, AppError> {
        let resp = self
            .http
            .get(&self.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Userinfo request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Google userinfo failed ({status}): {body}"
            )));
        }

        let info: GoogleUserInfo = resp
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse userinfo: {e}")))?;

        Ok(Profile {
            id: info.id,
            email: info.email,
            name: info.name.unwrap_or_default(),
            picture: info.picture,
        })
    }

    async fn list_messages(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<MessagePage, AppError> {
        let url = format!("{}/users/me/messages", self.endpoints.gmail);
        let resp = self
            .http
            .get(&url)
            .query(&[("maxResults", max_results)])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Message list request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Gmail message list failed ({status}): {body}"
            )));
        }

        let list: MessageListResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse message list: {e}")))?;

        Ok(MessagePage {
            message_ids: list.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: list.next_page_token,
        })
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let resp = self
            .http
            .post(&self.endpoints.revoke)
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Revoke request failed: {e}")))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("Google revoke failed: {body}")));
        }

        Ok(())
    }
}

/// Simple percent-encoding for URL parameters.
fn urlencoding(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
