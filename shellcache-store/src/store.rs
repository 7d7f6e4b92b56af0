//! This module provides a trait for interacting with cache bucket storage.
//! The storage holds named buckets, each mapping request identity to a stored
//! response. Buckets are created by name, enumerated, and deleted as whole
//! units; entries are written and matched per request.

use async_trait::async_trait;
use std::sync::Arc;

use crate::entry::{CachedResponse, RequestKey};
use crate::error::StoreError;

/// How a lookup compares request identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Full URL equality, query string included.
    Exact,
    /// Ignore the query string; compare method, origin and path.
    IgnoreQuery,
}

#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Create the named bucket if it does not exist yet.
    async fn open_bucket(&self, name: &str) -> Result<(), StoreError>;

    /// Write an entry. The bucket must have been opened; writing into an
    /// unknown bucket is a `BucketNotFound` error. An existing entry for the
    /// same identity is replaced.
    async fn put(
        &self,
        bucket: &str,
        key: &RequestKey,
        response: CachedResponse,
    ) -> Result<(), StoreError>;

    /// Write a group of entries in one step: either the bucket exists and
    /// every entry lands, or nothing is written.
    async fn put_many(
        &self,
        bucket: &str,
        entries: Vec<(RequestKey, CachedResponse)>,
    ) -> Result<(), StoreError>;

    /// Look up a request. A missing bucket is a miss, not an error.
    async fn match_request(
        &self,
        bucket: &str,
        key: &RequestKey,
        mode: MatchMode,
    ) -> Result<Option<CachedResponse>, StoreError>;

    /// Check whether an exact-identity entry exists.
    async fn contains(
        &self,
        bucket: &str,
        key: &RequestKey,
    ) -> Result<bool, StoreError>;

    /// Names of all buckets currently held.
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError>;

    /// Delete a bucket and everything in it. Returns whether it existed.
    async fn delete_bucket(&self, name: &str) -> Result<bool, StoreError>;
}

pub type AbstractBucketStore = Arc<dyn BucketStore + Send + Sync>;
