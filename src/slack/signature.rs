//! Slack request signature verification.
//!
//! Slack signs every webhook with `v0=` + hex(HMAC-SHA256(signing secret,
//! `v0:{timestamp}:{raw body}`)) and sends the timestamp separately.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, Result};

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
/// Header carrying the request timestamp (Unix seconds).
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

const VERSION: &str = "v0";

type HmacSha256 = Hmac<Sha256>;

/// Verifies inbound requests against the app's signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
    max_age_seconds: u64,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("max_age_seconds", &self.max_age_seconds)
            .finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// Create a verifier for `secret`, rejecting timestamps older or newer
    /// than `max_age_seconds`.
    #[must_use]
    pub fn new(secret: impl Into<String>, max_age_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            max_age_seconds,
        }
    }

    /// Verify a request against the current clock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Signature` if the timestamp is malformed or stale,
    /// or the signature does not match.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature: &str) -> Result<()> {
        self.verify_at(timestamp, body, signature, Utc::now().timestamp())
    }

    /// Verify a request as if the current time were `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Signature` if the timestamp is malformed or stale,
    /// or the signature does not match.
    pub fn verify_at(&self, timestamp: &str, body: &[u8], signature: &str, now: i64) -> Result<()> {
        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| AppError::Signature(format!("invalid timestamp {timestamp:?}")))?;

        if now.abs_diff(ts) > self.max_age_seconds {
            return Err(AppError::Signature("request timestamp too old".into()));
        }

        let provided = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
            .ok_or_else(|| AppError::Signature("malformed signature header".into()))?;

        self.mac(timestamp.trim(), body)?
            .verify_slice(&provided)
            .map_err(|_| AppError::Signature("signature mismatch".into()))
    }

    /// Compute the `v0=` signature Slack would send for this request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Signature` if the HMAC cannot be keyed.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String> {
        let digest = self.mac(timestamp, body)?.finalize().into_bytes();
        Ok(format!("{VERSION}={}", hex::encode(digest)))
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|err| AppError::Signature(format!("invalid signing key: {err}")))?;
        mac.update(VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}
