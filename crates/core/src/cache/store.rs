//! Result cache storage.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::hash::compute_cache_key;
use super::ttl::CacheTtlPolicy;
use crate::clock::{Clock, SystemClock};
use crate::types::RawSearchItem;

/// Cached upstream records with their storage time and lifetime.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<RawSearchItem>,
    stored_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.ttl
    }
}

/// Shared cache of raw search records keyed by `(domain, query)`.
///
/// Uses a HashMap behind a tokio RwLock. Concurrent writes to the same key
/// are not coordinated; the last write wins.
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl_policy: CacheTtlPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache").field("ttl_policy", &self.ttl_policy).finish_non_exhaustive()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheTtlPolicy::default(), Arc::new(SystemClock))
    }
}

impl ResultCache {
    /// Create an empty cache using `clock` for storage and expiry times.
    pub fn new(ttl_policy: CacheTtlPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl_policy, clock }
    }

    pub fn ttl_policy(&self) -> &CacheTtlPolicy {
        &self.ttl_policy
    }

    /// Get the cached records for `(domain, query)`.
    ///
    /// Returns None if there is no entry or it has outlived its TTL; an
    /// expired entry is removed on the way out.
    pub async fn get(&self, domain: &str, query: &str) -> Option<Vec<RawSearchItem>> {
        let key = compute_cache_key(domain, query);
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.data.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // A concurrent set may have refreshed the entry since the read lock was dropped.
        if entries.get(&key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(&key);
            tracing::debug!(domain, "evicted expired cache entry");
            return None;
        }
        entries.get(&key).map(|entry| entry.data.clone())
    }

    /// Store `data` for `(domain, query)` with the TTL of the domain's class.
    pub async fn set(&self, domain: &str, query: &str, data: Vec<RawSearchItem>) {
        let key = compute_cache_key(domain, query);
        let ttl = self.ttl_policy.ttl_for_domain(domain);
        let entry = CacheEntry { data, stored_at: self.clock.now(), ttl };
        self.entries.write().await.insert(key, entry);
    }

    /// Drop every entry, returning how many were stored.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
