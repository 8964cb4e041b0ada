//! In-process store for development and tests.

use chrono::{DateTime, Utc};
use coupon_common::{CouponRecord, SerialNumber};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CouponStore, MarkUsed, StoreResult};

/// HashMap-backed store; clones share the same map
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, CouponRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Write a record unconditionally
    #[cfg(test)]
    pub async fn put(&self, serial: &SerialNumber, record: CouponRecord) {
        self.records
            .write()
            .await
            .insert(serial.as_str().to_string(), record);
    }
}

impl CouponStore for MemoryStore {
    async fn get(&self, serial: &SerialNumber) -> StoreResult<Option<CouponRecord>> {
        Ok(self.records.read().await.get(serial.as_str()).cloned())
    }

    async fn insert_if_absent(
        &self,
        serial: &SerialNumber,
        record: &CouponRecord,
    ) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        if records.contains_key(serial.as_str()) {
            return Ok(false);
        }
        records.insert(serial.as_str().to_string(), record.clone());
        Ok(true)
    }

    async fn mark_used(
        &self,
        serial: &SerialNumber,
        used_at: DateTime<Utc>,
    ) -> StoreResult<MarkUsed> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(serial.as_str()) else {
            return Ok(MarkUsed::Missing);
        };
        if record.is_used() {
            return Ok(MarkUsed::AlreadyUsed);
        }
        record.used_at = Some(used_at);
        Ok(MarkUsed::Marked(record.clone()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serial(s: &str) -> SerialNumber {
        SerialNumber::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_collision() {
        let store = MemoryStore::new();
        let first = CouponRecord::new("a".into(), 1, None);
        let second = CouponRecord::new("b".into(), 2, None);

        assert!(store.insert_if_absent(&serial("000000000001"), &first).await.unwrap());
        assert!(!store.insert_if_absent(&serial("000000000001"), &second).await.unwrap());

        let stored = store.get(&serial("000000000001")).await.unwrap().unwrap();
        assert_eq!(stored, first);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mark_used_once() {
        let store = MemoryStore::new();
        let id = serial("000000000002");
        store.put(&id, CouponRecord::new("h".into(), 5, Some(42))).await;

        let now = Utc::now();
        match store.mark_used(&id, now).await.unwrap() {
            MarkUsed::Marked(record) => {
                assert_eq!(record.used_at, Some(now));
                assert_eq!(record.number, 5);
                assert_eq!(record.expired_at, Some(42));
            }
            other => panic!("expected Marked, got {:?}", other),
        }

        assert_eq!(store.mark_used(&id, Utc::now()).await.unwrap(), MarkUsed::AlreadyUsed);
        assert_eq!(
            store.mark_used(&serial("999999999999"), now).await.unwrap(),
            MarkUsed::Missing
        );
    }
}
