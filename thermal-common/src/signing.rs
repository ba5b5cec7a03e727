//! Time-limited signed object URLs
//!
//! A URL grants read access to one object key until an expiry instant
//! (Unix seconds). The signature is SHA-256 over key, expiry and a server
//! secret, rendered as 64 hex characters.

use crate::keys::validate_key;
use crate::Result;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Default lifetime of an issued URL
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(3600);

/// Reasons a presented signature is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Expired { expires_at: i64, now: i64 },
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::Expired { expires_at, now } => {
                write!(f, "URL expired {}s ago", now - expires_at)
            }
            SignatureError::Mismatch => write!(f, "Signature does not match"),
        }
    }
}

impl std::error::Error for SignatureError {}

#[derive(Clone)]
pub struct UrlSigner {
    secret: String,
    base_url: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UrlSigner {
    pub fn new(secret: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Random 256-bit hex secret, for when none is configured
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Signature for `key` valid until `expires_at`
    pub fn signature(&self, key: &str, expires_at: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires_at.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Issue a URL for `key` that expires `ttl` after `now`
    pub fn presign(&self, key: &str, ttl: Duration, now: i64) -> Result<String> {
        validate_key(key)?;
        let expires_at = now.saturating_add(ttl.as_secs() as i64);
        Ok(format!(
            "{}/objects/{}?expires={}&signature={}",
            self.base_url,
            key,
            expires_at,
            self.signature(key, expires_at)
        ))
    }

    /// Check a presented signature at time `now`
    pub fn verify(
        &self,
        key: &str,
        expires_at: i64,
        signature: &str,
        now: i64,
    ) -> std::result::Result<(), SignatureError> {
        if now > expires_at {
            return Err(SignatureError::Expired { expires_at, now });
        }
        if !constant_time_eq(self.signature(key, expires_at).as_bytes(), signature.as_bytes()) {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
