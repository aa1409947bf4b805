//! Expiry-gated access-token refresh.
//!
//! A token counts as expired once `now + skew` reaches the stored expiry.
//! Refreshed tokens are persisted before the caller uses them.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::account::{expiry_after, ConnectedAccount};
use super::traits::AccountStore;
use crate::error::AppError;
use crate::providers::GmailProvider;

/// Outcome of [`ensure_fresh_token`].
#[derive(Debug)]
pub struct FreshToken {
    pub account: ConnectedAccount,
    pub refreshed: bool,
}

/// Return `account` with a usable access token, refreshing it first if it
/// has expired.
pub async fn ensure_fresh_token(
    store: &dyn AccountStore,
    provider: &dyn GmailProvider,
    account: ConnectedAccount,
    skew: Duration,
    now: DateTime<Utc>,
) -> Result<FreshToken, AppError> {
    if !account.is_expired(now, skew) {
        return Ok(FreshToken {
            account,
            refreshed: false,
        });
    }

    let refresh_token = account.refresh_token.as_deref().ok_or_else(|| {
        AppError::RefreshFailed("token expired and no refresh token available".into())
    })?;

    let tokens = provider.refresh_token(refresh_token).await?;

    let expires_at = expiry_after(now, tokens.expires_in, provider.token_ttl());

    let updated = store
        .update_tokens(
            &account.id,
            &tokens.access_token,
            tokens.refresh_token.as_deref(),
            expires_at,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    info!("Refreshed Gmail token for {}", updated.email);

    Ok(FreshToken {
        account: updated,
        refreshed: true,
    })
}
