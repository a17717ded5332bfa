//! One-time password generation, storage and verification.

mod memory;

pub use memory::MemoryOtpStore;

use crate::error::RelayError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest code that can be generated; keeps every code six digits wide.
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Generate a uniformly random six-digit code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// A code issued to a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Create a record that expires `ttl` from now.
    pub fn new(code: impl Into<String>, ttl: Duration) -> Self {
        Self::expiring_at(code, Utc::now() + ttl)
    }

    /// Create a record with an explicit expiry instant.
    pub fn expiring_at(code: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            expires_at,
        }
    }

    /// Whether the record is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Key-value storage for issued codes, keyed by phone number.
///
/// Operations are independent of each other; callers get no atomicity
/// across a `get` followed by a `delete`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store `code` for `phone`, replacing any existing record.
    async fn put(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), RelayError>;

    /// Get the record for `phone`, expired or not.
    async fn get(&self, phone: &str) -> Result<Option<OtpRecord>, RelayError>;

    /// Remove the record for `phone`. No-op if absent.
    async fn delete(&self, phone: &str) -> Result<(), RelayError>;
}

/// Outcome of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid,
    NotSent,
    Expired,
    Incorrect,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        self == Verification::Valid
    }

    /// Human-readable reason for a failed verification.
    pub fn reason(self) -> Option<&'static str> {
        match self {
            Verification::Valid => None,
            Verification::NotSent => Some("No OTP sent"),
            Verification::Expired => Some("OTP expired"),
            Verification::Incorrect => Some("Incorrect OTP"),
        }
    }
}

/// Check `submitted` against the record stored for `phone`.
///
/// Expired records are purged here; there is no background sweep. A wrong
/// or missing code leaves the record in place so the user can retry.
pub async fn verify(
    store: &dyn OtpStore,
    phone: &str,
    submitted: Option<&str>,
) -> Result<Verification, RelayError> {
    let Some(record) = store.get(phone).await? else {
        return Ok(Verification::NotSent);
    };

    if record.is_expired_at(Utc::now()) {
        store.delete(phone).await?;
        return Ok(Verification::Expired);
    }

    if submitted == Some(record.code.as_str()) {
        store.delete(phone).await?;
        return Ok(Verification::Valid);
    }

    Ok(Verification::Incorrect)
}
