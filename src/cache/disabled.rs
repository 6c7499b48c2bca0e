//! Disabled cache backend: every read misses, every write succeeds.

use async_trait::async_trait;

use crate::cache::ProductCache;
use crate::error::CacheResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl ProductCache for DisabledCache {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn put(&self, _key: &str, _value: String) -> CacheResult<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }
}
