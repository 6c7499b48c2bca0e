//! Redis Cache Module
//!
//! Networked cache backend. One multiplexed connection manager is created
//! at startup and cloned for every command; it reconnects on its own after
//! the server goes away.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::cache::ProductCache;
use crate::error::{CacheError, CacheResult};

/// Turns a `host:port` address into a connection URL. Full URLs pass through.
pub fn redis_url(addr: &str) -> String {
    let addr = addr.trim();
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("redis://{}", addr)
    }
}

// == Redis Cache ==
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    /// Applied with `SET .. EX`; None stores without expiry
    ttl: Option<Duration>,
}

impl RedisCache {
    /// Connects to `addr` and checks the server answers `PING`.
    ///
    /// Both steps must finish within `timeout`.
    pub async fn connect(addr: &str, ttl: Option<Duration>, timeout: Duration) -> CacheResult<Self> {
        let url = redis_url(addr);
        let client = redis::Client::open(url.as_str())?;

        let mut conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(timeout))??;

        let pong: String = tokio::time::timeout(timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| CacheError::Timeout(timeout))??;
        debug!(reply = %pong, "redis ping");
        info!(url = %url, "Connected to Redis");

        Ok(Self { conn, ttl })
    }
}

#[async_trait]
impl ProductCache for RedisCache {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, key: &str, value: String) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        match self.ttl {
            None => {
                let _: () = conn.set(key, value).await?;
            }
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}
