//! Cache Module
//!
//! The side cache consulted by the catalog service. Backends implement
//! [`ProductCache`]; values are serialized products keyed by product id.
//!
//! # Backends
//! - `RedisCache` - networked Redis server, one shared connection manager
//! - `MemoryCache` - in-process, optional TTL and LRU capacity bound
//! - `DisabledCache` - always misses, accepts every write

mod connect;
mod disabled;
mod entry;
mod memory;
mod redis_cache;
mod stats;


use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use connect::build_cache;
pub use disabled::DisabledCache;
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::{redis_url, RedisCache};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Product Cache Trait ==
/// A key-value cache of serialized products.
///
/// `get` distinguishes a hit (`Ok(Some)`), a miss (`Ok(None)`) and a
/// backend failure (`Err`). Implementations must be safe to share
/// between concurrent requests without external locking.
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// Short backend name for logs and stats.
    fn backend(&self) -> &'static str;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: String) -> CacheResult<()>;

    /// Looks up `key`.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Live entries dropped to stay within a capacity bound. Backends
    /// that never evict on their own report zero.
    fn evictions(&self) -> u64 {
        0
    }
}

/// Cache key for a product id.
pub fn cache_key(id: i64) -> String {
    id.to_string()
}
