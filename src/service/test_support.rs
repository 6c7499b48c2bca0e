//! Misbehaving cache backends for exercising the fallback paths.

use async_trait::async_trait;

use crate::cache::ProductCache;
use crate::error::{CacheError, CacheResult};

/// Every call fails as if the server were down.
pub struct UnreachableCache;

#[async_trait]
impl ProductCache for UnreachableCache {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn put(&self, _key: &str, _value: String) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// Every call hangs forever.
pub struct StallingCache;

#[async_trait]
impl ProductCache for StallingCache {
    fn backend(&self) -> &'static str {
        "stalling"
    }

    async fn put(&self, _key: &str, _value: String) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        std::future::pending().await
    }
}

/// Accepts writes, answers every read with garbage.
pub struct CorruptCache;

#[async_trait]
impl ProductCache for CorruptCache {
    fn backend(&self) -> &'static str {
        "corrupt"
    }

    async fn put(&self, _key: &str, _value: String) -> CacheResult<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(Some("{not json".to_string()))
    }
}
