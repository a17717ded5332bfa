//! In-memory OTP store.

use super::{OtpRecord, OtpStore};
use crate::error::RelayError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local OTP store. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryOtpStore {
    /// Records indexed by phone number
    records: Arc<RwLock<HashMap<String, OtpRecord>>>,
}

impl MemoryOtpStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prepared record, replacing any existing one.
    pub async fn insert(&self, phone: &str, record: OtpRecord) {
        self.records.write().await.insert(phone.to_string(), record);
    }

    /// Number of records held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), RelayError> {
        let record = OtpRecord::new(code, ttl);
        debug!(phone = %phone, expires_at = %record.expires_at, "Storing OTP");
        self.insert(phone, record).await;
        Ok(())
    }

    async fn get(&self, phone: &str) -> Result<Option<OtpRecord>, RelayError> {
        Ok(self.records.read().await.get(phone).cloned())
    }

    async fn delete(&self, phone: &str) -> Result<(), RelayError> {
        self.records.write().await.remove(phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryOtpStore::new();
        store.put("15551234567", "123456", TTL).await.unwrap();

        let record = store.get("15551234567").await.unwrap().unwrap();
        assert_eq!(record.code, "123456");
        assert!(record.expires_at > chrono::Utc::now());
        assert!(store.get("15559999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_code() {
        let store = MemoryOtpStore::new();
        store.put("15551234567", "111111", TTL).await.unwrap();
        store.put("15551234567", "222222", TTL).await.unwrap();

        assert_eq!(store.len().await, 1);
        let record = store.get("15551234567").await.unwrap().unwrap();
        assert_eq!(record.code, "222222");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryOtpStore::new();
        store.put("15551234567", "123456", TTL).await.unwrap();

        store.delete("15551234567").await.unwrap();
        assert!(store.is_empty().await);

        // Deleting again is a no-op
        store.delete("15551234567").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryOtpStore::new();
        let handle = store.clone();
        store.put("15551234567", "123456", TTL).await.unwrap();

        assert!(handle.get("15551234567").await.unwrap().is_some());
    }
}
