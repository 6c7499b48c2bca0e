//! Cache startup
//!
//! Builds the configured backend. An unreachable Redis is fatal only when
//! the configuration marks the cache as required; otherwise the service
//! starts with the cache disabled.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{DisabledCache, MemoryCache, ProductCache, RedisCache};
use crate::config::{CacheBackend, Config};
use crate::error::StartupError;

/// Creates the cache backend selected by `config`.
pub async fn build_cache(config: &Config) -> Result<Arc<dyn ProductCache>, StartupError> {
    match config.cache_backend {
        CacheBackend::Disabled => {
            info!("Cache disabled by configuration");
            Ok(Arc::new(DisabledCache))
        }
        CacheBackend::Memory => {
            info!(
                max_entries = config.cache_max_entries,
                ttl = ?config.cache_ttl,
                "Using in-process cache"
            );
            Ok(Arc::new(MemoryCache::new(
                config.cache_max_entries,
                config.cache_ttl,
            )))
        }
        CacheBackend::Redis => {
            match RedisCache::connect(
                &config.cache_addr,
                config.cache_ttl,
                config.cache_connect_timeout,
            )
            .await
            {
                Ok(cache) => Ok(Arc::new(cache)),
                Err(source) if config.cache_required => Err(StartupError::CacheConnectivity {
                    addr: config.cache_addr.clone(),
                    source,
                }),
                Err(err) => {
                    warn!(
                        addr = %config.cache_addr,
                        error = %err,
                        "Could not connect to Redis, continuing with cache disabled"
                    );
                    Ok(Arc::new(DisabledCache))
                }
            }
        }
    }
}
