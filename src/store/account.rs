//! Connected account record and its client-facing projection.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::providers::{Profile, TokenSet};

/// A user's Gmail connection: identity, tokens and sync metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedAccount {
    /// Google account id, used as the store key.
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub connected_at: DateTime<Utc>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl ConnectedAccount {
    /// Build a fresh record from a completed exchange.
    ///
    /// `default_ttl` applies when the provider did not report `expires_in`.
    pub fn from_exchange(
        profile: Profile,
        tokens: TokenSet,
        default_ttl: std::time::Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            picture: profile.picture,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: expiry_after(now, tokens.expires_in, default_ttl),
            connected_at: now,
            last_synced: None,
        }
    }

    /// Overwrite this record with `incoming`, keeping the stored refresh
    /// token when `incoming` has none.
    pub fn merge(&mut self, incoming: ConnectedAccount) {
        let refresh_token = incoming.refresh_token.or_else(|| self.refresh_token.take());
        *self = ConnectedAccount {
            refresh_token,
            ..incoming
        };
    }

    /// Whether the access token must be refreshed before use.
    ///
    /// `skew` moves the cutoff earlier; zero compares the expiry exactly.
    pub fn is_expired(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew >= self.expires_at
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            picture: self.picture.clone(),
            connected_at: self.connected_at,
            expiry_date: self.expires_at,
            last_synced: self.last_synced,
        }
    }
}

/// Instant `expires_in` seconds after `now`.
///
/// Falls back to `default_ttl` when the lifetime is missing or too large to
/// represent as a timestamp.
pub fn expiry_after(
    now: DateTime<Utc>,
    expires_in: Option<u64>,
    default_ttl: std::time::Duration,
) -> DateTime<Utc> {
    let after = |secs: u64| {
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
    };

    expires_in
        .and_then(after)
        .or_else(|| after(default_ttl.as_secs()))
        .unwrap_or(now)
}

/// Account metadata safe to return to clients (no tokens).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub last_synced: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(refresh: Option<&str>) -> ConnectedAccount {
        let now = Utc::now();
        ConnectedAccount {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            picture: None,
            access_token: "T1".into(),
            refresh_token: refresh.map(str::to_string),
            expires_at: now + Duration::seconds(3600),
            connected_at: now,
            last_synced: Some(now),
        }
    }

    #[test]
    fn merge_keeps_refresh_token_when_absent() {
        let mut stored = account(Some("R1"));
        let mut incoming = account(None);
        incoming.access_token = "T2".into();
        incoming.name = "A. Person".into();
        incoming.last_synced = None;

        stored.merge(incoming);

        assert_eq!(stored.refresh_token.as_deref(), Some("R1"));
        assert_eq!(stored.access_token, "T2");
        assert_eq!(stored.name, "A. Person");
        assert_eq!(stored.last_synced, None);
    }

    #[test]
    fn merge_replaces_refresh_token_when_present() {
        let mut stored = account(Some("R1"));
        stored.merge(account(Some("R2")));
        assert_eq!(stored.refresh_token.as_deref(), Some("R2"));
    }

    #[test]
    fn expiry_respects_skew() {
        let now = Utc::now();
        let mut acct = account(None);
        acct.expires_at = now + Duration::seconds(30);

        assert!(!acct.is_expired(now, Duration::zero()));
        assert!(acct.is_expired(now, Duration::seconds(60)));
        assert!(acct.is_expired(now + Duration::seconds(31), Duration::zero()));
    }

    #[test]
    fn from_exchange_falls_back_to_default_ttl() {
        let now = Utc::now();
        let profile = Profile {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            picture: Some("https://example.com/a.png".into()),
        };
        let tokens = TokenSet {
            access_token: "T1".into(),
            refresh_token: Some("R1".into()),
            expires_in: None,
        };

        let acct =
            ConnectedAccount::from_exchange(profile, tokens, std::time::Duration::from_secs(3600), now);

        assert_eq!(acct.expires_at, now + Duration::seconds(3600));
        assert_eq!(acct.connected_at, now);
        assert!(acct.last_synced.is_none());
    }

    #[test]
    fn unrepresentable_lifetimes_fall_back_to_default_ttl() {
        let now = Utc::now();
        let ttl = std::time::Duration::from_secs(3600);
        let fallback = now + Duration::seconds(3600);

        assert_eq!(expiry_after(now, Some(u64::MAX), ttl), fallback);
        assert_eq!(expiry_after(now, Some(1 << 62), ttl), fallback);
        assert_eq!(expiry_after(now, Some(1 << 50), ttl), fallback);
        assert_eq!(expiry_after(now, Some(120), ttl), now + Duration::seconds(120));
    }

    #[test]
    fn summary_serializes_camel_case_without_tokens() {
        let json = serde_json::to_value(account(Some("R1")).summary()).unwrap();
        assert!(json.get("connectedAt").is_some());
        assert!(json.get("expiryDate").is_some());
        assert!(json.get("lastSynced").is_some());
        assert!(json.get("accessToken").is_none());
        assert!(json.get("refreshToken").is_none());
    }
}
