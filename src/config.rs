use anyhow::{bail, Context, Result};

/// Upper bound for `TOKEN_EXPIRY_SKEW_SECS`: one day.
pub const MAX_EXPIRY_SKEW_SECS: i64 = 86_400;

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // ── Server ──────────────────────────────────────────────────────────
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,

    // ── Google OAuth client ─────────────────────────────────────────────
    pub google_client_id: String,
    pub google_client_secret: String,
    pub redirect_uri: String,

    // ── Admin sessions ──────────────────────────────────────────────────
    pub admin_secret_key: String,
    /// HS256 key for admin session tokens and OAuth state signing.
    pub jwt_secret: String,
    pub admin_session_ttl_secs: i64,
    pub cookie_secure: bool,

    // ── Sync ────────────────────────────────────────────────────────────
    /// Seconds before the stored expiry at which a token counts as expired.
    pub token_expiry_skew_secs: i64,
    pub sync_page_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .context("Invalid PORT")?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            google_client_id: std::env::var("GOOGLE_CLIENT_ID")
                .context("GOOGLE_CLIENT_ID is required")?,
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .context("GOOGLE_CLIENT_SECRET is required")?,
            redirect_uri: std::env::var("REDIRECT_URI")
                .context("REDIRECT_URI is required (OAuth callback URL)")?,

            admin_secret_key: std::env::var("ADMIN_SECRET_KEY")
                .context("ADMIN_SECRET_KEY is required")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET is required (signs admin sessions)")?,
            admin_session_ttl_secs: std::env::var("ADMIN_SESSION_TTL_SECS")
                .unwrap_or_else(|_| "3600".into())
                .parse()
                .context("Invalid ADMIN_SESSION_TTL_SECS")?,
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),

            token_expiry_skew_secs: parse_expiry_skew(
                &std::env::var("TOKEN_EXPIRY_SKEW_SECS").unwrap_or_else(|_| "0".into()),
            )?,
            sync_page_size: std::env::var("SYNC_PAGE_SIZE")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .context("Invalid SYNC_PAGE_SIZE")?,
        })
    }

    /// Listen address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_expiry_skew(raw: &str) -> Result<i64> {
    let secs: i64 = raw
        .trim()
        .parse()
        .context("Invalid TOKEN_EXPIRY_SKEW_SECS")?;
    if !(0..=MAX_EXPIRY_SKEW_SECS).contains(&secs) {
        bail!("TOKEN_EXPIRY_SKEW_SECS must be between 0 and {MAX_EXPIRY_SKEW_SECS}, got {secs}");
    }
    Ok(secs)
}
