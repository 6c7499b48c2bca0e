//! Memory Cache Module
//!
//! In-process cache backend: HashMap storage, lazy TTL expiry and
//! least-recently-used eviction once the capacity is reached.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, ProductCache, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    /// Recency stamp -> key, oldest first
    recency: BTreeMap<u64, String>,
    clock: u64,
}

impl Inner {
    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp();
        if let Some(entry) = self.entries.get_mut(key) {
            self.recency.remove(&entry.last_used);
            entry.last_used = stamp;
            self.recency.insert(stamp, key.to_string());
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.last_used);
        }
    }

    /// Drops every entry that has expired by `now`.
    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

// == Memory Cache ==
/// Bounded in-process cache.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    max_entries: usize,
    ttl: Option<Duration>,
    evictions: AtomicU64,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` values, each living
    /// for `ttl` (or forever when None).
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries: max_entries.max(1),
            ttl,
            evictions: AtomicU64::new(0),
        }
    }

    /// Number of stored entries, expired ones included until they are
    /// read or purged.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl ProductCache for MemoryCache {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    async fn put(&self, key: &str, value: String) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let mut inner = self.inner.lock().await;
        inner.remove(key);
        if inner.entries.len() >= self.max_entries && self.ttl.is_some() {
            let purged = inner.purge_expired(Instant::now());
            if purged > 0 {
                debug!(purged, "dropped expired entries");
            }
        }
        if inner.entries.len() >= self.max_entries {
            if let Some(evicted) = inner.evict_oldest() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        let stamp = inner.next_stamp();
        inner.recency.insert(stamp, key.to_string());
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, self.ttl, stamp));
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut inner = self.inner.lock().await;
        let value = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };

        match value {
            Some(value) => {
                inner.touch(key);
                Ok(Some(value))
            }
            None => {
                inner.remove(key);
                Ok(None)
            }
        }
    }
}
