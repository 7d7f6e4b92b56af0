//! In-memory implementation of the BucketStore trait. Buckets live in a
//! single mutex-guarded map of maps; entries are keyed by the exact request
//! identity string and carry the query-insensitive key alongside for lenient
//! matching.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::entry::{CacheEntry, CachedResponse, RequestKey};
use crate::error::StoreError;
use crate::store::{BucketStore, MatchMode};
use async_trait::async_trait;

#[derive(Default)]
pub struct InMemoryBucketStore {
    buckets: Mutex<HashMap<String, HashMap<String, CacheEntry>>>,
}

impl InMemoryBucketStore {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BucketStore for InMemoryBucketStore {
    async fn open_bucket(&self, name: &str) -> Result<(), StoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        buckets.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &RequestKey,
        response: CachedResponse,
    ) -> Result<(), StoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let entries = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        let entry = CacheEntry::new(key, response);
        tracing::debug!(bucket, key = %entry.key, "stored entry");
        entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn put_many(
        &self,
        bucket: &str,
        items: Vec<(RequestKey, CachedResponse)>,
    ) -> Result<(), StoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let entries = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        for (key, response) in items {
            let entry = CacheEntry::new(&key, response);
            entries.insert(entry.key.clone(), entry);
        }
        Ok(())
    }

    async fn match_request(
        &self,
        bucket: &str,
        key: &RequestKey,
        mode: MatchMode,
    ) -> Result<Option<CachedResponse>, StoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let Some(entries) = buckets.get_mut(bucket) else {
            return Ok(None);
        };

        let entry = match mode {
            MatchMode::Exact => entries.get_mut(&key.cache_key()),
            MatchMode::IgnoreQuery => {
                let path_key = key.path_key();
                entries
                    .values_mut()
                    .find(|entry| entry.path_key == path_key)
            }
        };

        if let Some(entry) = entry {
            entry.last_accessed = Utc::now();
            Ok(Some(entry.response.clone()))
        } else {
            Ok(None)
        }
    }

    async fn contains(
        &self,
        bucket: &str,
        key: &RequestKey,
    ) -> Result<bool, StoreError> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(buckets
            .get(bucket)
            .is_some_and(|entries| entries.contains_key(&key.cache_key())))
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(buckets.keys().cloned().collect())
    }

    async fn delete_bucket(&self, name: &str) -> Result<bool, StoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(buckets.remove(name).is_some())
    }
}

impl std::fmt::Debug for InMemoryBucketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let buckets = self.buckets.lock().unwrap();
        let sizes: HashMap<&String, usize> =
            buckets.iter().map(|(name, e)| (name, e.len())).collect();
        f.debug_struct("InMemoryBucketStore")
            .field("buckets", &sizes)
            .finish()
    }
}
