//! In-memory account store. Lifetime equals process uptime.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::account::ConnectedAccount;
use super::traits::AccountStore;
use crate::error::AppError;

/// Account store backed by a `HashMap` behind a single `RwLock`.
///
/// `list` returns accounts in first-insertion order. A re-connect keeps the
/// account's position; removing and re-adding moves it to the end.
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Accounts>,
}

#[derive(Default)]
struct Accounts {
    by_id: HashMap<String, Slot>,
    next_seq: u64,
}

struct Slot {
    seq: u64,
    account: ConnectedAccount,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn upsert(&self, account: ConnectedAccount) -> Result<ConnectedAccount, AppError> {
        let mut inner = self.inner.write().await;
        if let Some(slot) = inner.by_id.get_mut(&account.id) {
            slot.account.merge(account);
            return Ok(slot.account.clone());
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.by_id.insert(
            account.id.clone(),
            Slot {
                seq,
                account: account.clone(),
            },
        );
        Ok(account)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ConnectedAccount>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .by_id
            .get(id)
            .map(|slot| slot.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<ConnectedAccount>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .by_id
            .values()
            .find(|slot| slot.account.email == email)
            .map(|slot| slot.account.clone()))
    }

    async fn list(&self) -> Result<Vec<ConnectedAccount>, AppError> {
        let inner = self.inner.read().await;
        let mut slots: Vec<&Slot> = inner.by_id.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        Ok(slots.into_iter().map(|slot| slot.account.clone()).collect())
    }

    async fn update_tokens(
        &self,
        id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<ConnectedAccount>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.by_id.get_mut(id).map(|slot| {
            let acct = &mut slot.account;
            acct.access_token = access_token.to_string();
            if let Some(rt) = refresh_token {
                acct.refresh_token = Some(rt.to_string());
            }
            acct.expires_at = expires_at;
            acct.clone()
        }))
    }

    async fn mark_synced(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectedAccount>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.by_id.get_mut(id).map(|slot| {
            slot.account.last_synced = Some(at);
            slot.account.clone()
        }))
    }

    async fn remove(&self, id: &str) -> Result<Option<ConnectedAccount>, AppError> {
        Ok(self
            .inner
            .write()
            .await
            .by_id
            .remove(id)
            .map(|slot| slot.account))
    }
}
