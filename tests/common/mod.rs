//! Shared fixtures: an in-process fake provider and app-state builders.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gmail_connect::providers::{GmailProvider, MessagePage, Profile, TokenSet};
use gmail_connect::store::{AccountStore, ConnectedAccount, MemoryAccountStore};
use gmail_connect::{AppError, AppState, Config, SharedState};

pub const ADMIN_SECRET: &str = "admin-secret";

/// Scriptable provider. Queued exchange results are consumed in order.
#[derive(Default)]
pub struct FakeProvider {
    pub exchanges: Mutex<VecDeque<Result<TokenSet, String>>>,
    pub profile: Mutex<Option<Profile>>,
    pub refreshed: Mutex<Option<TokenSet>>,
    pub message_ids: Mutex<Vec<String>>,
    pub fail_list: Mutex<bool>,
    pub fail_revoke: Mutex<bool>,
    pub refresh_calls: AtomicUsize,
    pub revoke_calls: AtomicUsize,
    pub listed_with: Mutex<Vec<String>>,
    pub revoked_tokens: Mutex<Vec<String>>,
    /// Account upserted while a revoke call is in flight.
    pub reconnect_during_revoke: Mutex<Option<(Arc<MemoryAccountStore>, ConnectedAccount)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_exchange(&self, access: &str, refresh: Option<&str>, expires_in: u64) {
        self.exchanges.lock().unwrap().push_back(Ok(tokens(access, refresh, expires_in)));
    }

    pub fn push_exchange_failure(&self, reason: &str) {
        self.exchanges.lock().unwrap().push_back(Err(reason.to_string()));
    }

    pub fn set_profile(&self, id: &str, email: &str, name: &str) {
        *self.profile.lock().unwrap() = Some(Profile {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            picture: None,
        });
    }

    pub fn set_refresh(&self, access: &str, refresh: Option<&str>, expires_in: u64) {
        *self.refreshed.lock().unwrap() = Some(tokens(access, refresh, expires_in));
    }

    pub fn set_messages(&self, n: usize) {
        *self.message_ids.lock().unwrap() = (0..n).map(|i| format!("m{i}")).collect();
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn revoke_calls(&self) -> usize {
        self.revoke_calls.load(Ordering::SeqCst)
    }
}

pub fn tokens(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenSet {
    TokenSet {
        access_token: access.into(),
        refresh_token: refresh.map(str::to_string),
        expires_in: Some(expires_in),
    }
}

#[async_trait]
impl GmailProvider for FakeProvider {
    fn auth_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/auth?state={state}")
    }

    async fn exchange_code(&self, _code: &str) -> Result<TokenSet, AppError> {
        match self.exchanges.lock().unwrap().pop_front() {
            Some(Ok(t)) => Ok(t),
            Some(Err(e)) => Err(AppError::Provider(e)),
            None => Err(AppError::Provider("invalid_grant".into())),
        }
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<TokenSet, AppError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshed
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::RefreshFailed("invalid_grant".into()))
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<Profile, AppError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Provider("userinfo unavailable".into()))
    }

    async fn list_messages(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<MessagePage, AppError> {
        self.listed_with.lock().unwrap().push(access_token.to_string());
        if *self.fail_list.lock().unwrap() {
            return Err(AppError::Provider("quota exceeded".into()));
        }
        let ids = self.message_ids.lock().unwrap();
        Ok(MessagePage {
            message_ids: ids.iter().take(max_results as usize).cloned().collect(),
            next_page_token: None,
        })
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        self.revoked_tokens.lock().unwrap().push(token.to_string());
        let reconnect = self.reconnect_during_revoke.lock().unwrap().take();
        if let Some((store, account)) = reconnect {
            store.upsert(account).await?;
        }
        if *self.fail_revoke.lock().unwrap() {
            return Err(AppError::Provider("revoke endpoint unavailable".into()));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        google_client_id: "client-id".into(),
        google_client_secret: "client-secret".into(),
        redirect_uri: "http://localhost:5173/callback".into(),
        admin_secret_key: ADMIN_SECRET.into(),
        jwt_secret: "jwt-secret-for-tests".into(),
        admin_session_ttl_secs: 3600,
        cookie_secure: false,
        token_expiry_skew_secs: 0,
        sync_page_size: 10,
    }
}

pub struct TestApp {
    pub state: SharedState,
    pub store: Arc<MemoryAccountStore>,
    pub provider: Arc<FakeProvider>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryAccountStore::new());
    let provider = Arc::new(FakeProvider::new());
    let state = Arc::new(
        AppState::new(test_config(), store.clone(), provider.clone()).expect("app state"),
    );
    TestApp {
        state,
        store,
        provider,
    }
}

/// Seed an account whose token expires `expires_in_secs` from now
/// (negative for already expired).
pub async fn seed_account(store: &MemoryAccountStore, id: &str, email: &str, expires_in_secs: i64) {
    let now = Utc::now();
    store
        .upsert(ConnectedAccount {
            id: id.into(),
            email: email.into(),
            name: "A".into(),
            picture: None,
            access_token: "T1".into(),
            refresh_token: Some("R1".into()),
            expires_at: now + Duration::seconds(expires_in_secs),
            connected_at: now,
            last_synced: None,
        })
        .await
        .expect("seed");
}
