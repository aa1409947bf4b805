//! Best-effort revoke.
//!
//! Local removal always happens. A failed remote revocation is logged and
//! reported as a warning, never as an error.

use tracing::{info, warn};

use crate::error::AppError;
use crate::AppState;

pub const REVOKE_WARNING: &str = "User removed but token revocation may have failed";

/// What happened during a revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevokeOutcome {
    /// An account was present and has been removed.
    pub removed: bool,
    /// The provider confirmed revocation. `false` when there was nothing to
    /// revoke or the call failed.
    pub remote_revoked: bool,
}

impl RevokeOutcome {
    pub fn warning(&self) -> Option<&'static str> {
        (self.removed && !self.remote_revoked).then_some(REVOKE_WARNING)
    }
}

/// Remove an account, then revoke its access token at the provider.
///
/// Removal happens first so a re-connect stored while the provider call is
/// in flight survives.
pub async fn revoke_account(state: &AppState, id: &str) -> Result<RevokeOutcome, AppError> {
    let Some(account) = state.store.remove(id).await? else {
        info!("Revoke for unknown account {id}: nothing to do");
        return Ok(RevokeOutcome {
            removed: false,
            remote_revoked: false,
        });
    };
    info!("Removed Gmail account {} ({id})", account.email);

    let remote_revoked = match state.provider.revoke(&account.access_token).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Revoke error for {}: {e}", account.email);
            false
        }
    };

    Ok(RevokeOutcome {
        removed: true,
        remote_revoked,
    })
}
