use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::account::ConnectedAccount;
use crate::error::AppError;

/// CRUD over connected accounts, keyed by account id with email as a
/// secondary lookup key.
///
/// Implementations must serialize mutations: two concurrent upserts for the
/// same id never interleave their merge.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert, or merge into the existing record (an absent refresh token
    /// keeps the stored one). Returns the stored record.
    async fn upsert(&self, account: ConnectedAccount) -> Result<ConnectedAccount, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ConnectedAccount>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<ConnectedAccount>, AppError>;

    /// All accounts, oldest connection first.
    async fn list(&self) -> Result<Vec<ConnectedAccount>, AppError>;

    /// Persist refreshed tokens. `None` keeps the stored refresh token.
    async fn update_tokens(
        &self,
        id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<ConnectedAccount>, AppError>;

    async fn mark_synced(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectedAccount>, AppError>;

    /// Delete if present. Removing an absent id is not an error.
    async fn remove(&self, id: &str) -> Result<Option<ConnectedAccount>, AppError>;
}
