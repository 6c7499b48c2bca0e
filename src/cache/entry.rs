//! Cache Entry Module
//!
//! A single value held by the memory backend, with its expiry and
//! recency stamp.

use std::time::{Duration, Instant};

// == Cache Entry ==
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized product
    pub value: String,
    /// None = never expires
    pub expires_at: Option<Instant>,
    /// Recency stamp; larger is more recently used
    pub last_used: u64,
}

impl CacheEntry {
    /// Creates an entry that expires `ttl` from now, or never.
    pub fn new(value: String, ttl: Option<Duration>, last_used: u64) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
            last_used,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(expires) if now >= expires)
    }
}
