//! Admin-triggered sync: refresh the token if needed, then count messages.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::AppError;
use crate::store::ensure_fresh_token;
use crate::AppState;

/// Result of a successful sync.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub message_count: usize,
    pub last_synced: DateTime<Utc>,
    #[serde(skip)]
    pub refreshed: bool,
}

/// Sync one account by id.
///
/// An unknown id is `NotFound`; refresh and listing failures are
/// `SyncFailed`. Nothing is retried.
pub async fn sync_account(state: &AppState, id: &str) -> Result<SyncReport, AppError> {
    let account = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    let skew = Duration::try_seconds(state.config.token_expiry_skew_secs)
        .ok_or_else(|| AppError::Internal("token expiry skew out of range".into()))?;
    let fresh = ensure_fresh_token(
        state.store.as_ref(),
        state.provider.as_ref(),
        account,
        skew,
        Utc::now(),
    )
    .await
    .map_err(into_sync_error)?;

    let page = state
        .provider
        .list_messages(&fresh.account.access_token, state.config.sync_page_size)
        .await
        .map_err(into_sync_error)?;

    let now = Utc::now();
    let synced = state
        .store
        .mark_synced(id, now)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    info!(
        "Synced {}: {} messages (token refreshed: {})",
        synced.email,
        page.message_ids.len(),
        fresh.refreshed
    );

    Ok(SyncReport {
        message_count: page.message_ids.len(),
        last_synced: synced.last_synced.unwrap_or(now),
        refreshed: fresh.refreshed,
    })
}

fn into_sync_error(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => e,
        other => {
            error!("Sync error: {other}");
            AppError::SyncFailed(other.to_string())
        }
    }
}
