use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// How long a signed OAuth state stays valid.
pub const STATE_MAX_AGE_SECS: i64 = 10 * 60;

/// Helper to create an HMAC instance, resolving trait ambiguity.
fn new_hmac(key: &[u8]) -> Result<HmacSha256, AppError> {
    <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC init failed: {e}")))
}

/// HMAC-SHA256 signing for OAuth state parameters and constant-time secret
/// comparison.
pub struct CryptoEngine {
    hmac_key: Vec<u8>,
}

impl CryptoEngine {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Internal("signing secret must not be empty".into()));
        }
        Ok(Self {
            hmac_key: secret.as_bytes().to_vec(),
        })
    }

    /// Sign a payload with HMAC-SHA256. Returns base64url(hmac || payload).
    pub fn sign_state(&self, payload: &str) -> Result<String, AppError> {
        let mut mac = new_hmac(&self.hmac_key)?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        let mut combined = signature.to_vec();
        combined.extend_from_slice(payload.as_bytes());

        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&combined))
    }

    /// Verify and extract a signed payload.
    pub fn verify_state(&self, signed: &str) -> Result<String, AppError> {
        let combined = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signed)
            .map_err(|_| AppError::InvalidState)?;

        if combined.len() < 32 {
            return Err(AppError::InvalidState);
        }

        let (signature, payload_bytes) = combined.split_at(32);

        let mut mac = new_hmac(&self.hmac_key)?;
        mac.update(payload_bytes);
        mac.verify_slice(signature)
            .map_err(|_| AppError::InvalidState)?;

        String::from_utf8(payload_bytes.to_vec()).map_err(|_| AppError::InvalidState)
    }

    /// Issue a fresh OAuth state: signed `<nonce>:<unix_timestamp>`.
    pub fn issue_state(&self, now_ts: i64) -> Result<String, AppError> {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        self.sign_state(&format!("{}:{}", hex::encode(nonce), now_ts))
    }

    /// Check a state produced by [`CryptoEngine::issue_state`] and reject it
    /// once older than [`STATE_MAX_AGE_SECS`].
    pub fn check_state(&self, signed: &str, now_ts: i64) -> Result<(), AppError> {
        let payload = self.verify_state(signed)?;
        let (_, ts) = payload.rsplit_once(':').ok_or(AppError::InvalidState)?;
        let ts: i64 = ts.parse().map_err(|_| AppError::InvalidState)?;

        if now_ts - ts > STATE_MAX_AGE_SECS || ts - now_ts > 60 {
            return Err(AppError::InvalidState);
        }
        Ok(())
    }

    /// Compare a caller-provided secret against the expected one without
    /// leaking timing information about where they differ.
    pub fn secrets_match(&self, provided: &str, expected: &str) -> bool {
        if expected.is_empty() {
            return false;
        }
        let Ok(mut expected_mac) = new_hmac(&self.hmac_key) else {
            return false;
        };
        expected_mac.update(expected.as_bytes());
        let expected_tag = expected_mac.finalize().into_bytes();

        let Ok(mut provided_mac) = new_hmac(&self.hmac_key) else {
            return false;
        };
        provided_mac.update(provided.as_bytes());
        provided_mac.verify_slice(&expected_tag).is_ok()
    }
}
