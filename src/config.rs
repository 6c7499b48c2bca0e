//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::time::Duration;

// == Cache Backend ==
/// Which cache sits in front of the product store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Networked Redis server at `REDIS_HOST`
    Redis,
    /// In-process cache with optional TTL and LRU capacity
    Memory,
    /// No cache; every read goes to the store
    Disabled,
}

impl CacheBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "memory" => Some(Self::Memory),
            "none" | "disabled" | "off" => Some(Self::Disabled),
            _ => None,
        }
    }
}

// == Duplicate Id Policy ==
/// What CreateProduct does when the id is already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateIdPolicy {
    /// Refuse the create with a validation error
    Reject,
    /// Append anyway; reads keep returning the first record with that id
    Shadow,
}

impl DuplicateIdPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "shadow" => Some(Self::Shadow),
            _ => None,
        }
    }
}

// == Log Format ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Selected cache backend
    pub cache_backend: CacheBackend,
    /// Redis address, `host:port` or a `redis://` URL
    pub cache_addr: String,
    /// Whether an unreachable cache at startup is fatal
    pub cache_required: bool,
    /// Upper bound on every cache call
    pub cache_timeout: Duration,
    /// Upper bound on the startup connectivity check
    pub cache_connect_timeout: Duration,
    /// Entry TTL, None = entries never expire
    pub cache_ttl: Option<Duration>,
    /// Capacity of the memory backend
    pub cache_max_entries: usize,
    pub duplicate_id_policy: DuplicateIdPolicy,
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `CACHE_BACKEND` - `redis`, `memory` or `none` (default: redis)
    /// - `REDIS_HOST` - Redis address (default: 127.0.0.1:6379)
    /// - `CACHE_REQUIRED` - Fail startup if the cache is unreachable (default: false)
    /// - `CACHE_TIMEOUT_MS` - Per-call cache timeout in milliseconds (default: 250)
    /// - `CACHE_CONNECT_TIMEOUT_MS` - Startup connectivity timeout in milliseconds (default: 3000)
    /// - `CACHE_TTL` - Entry TTL in seconds, 0 disables expiry (default: 0)
    /// - `CACHE_MAX_ENTRIES` - Memory backend capacity (default: 10000)
    /// - `DUPLICATE_ID_POLICY` - `reject` or `shadow` (default: reject)
    /// - `LOG_FORMAT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a Config from an arbitrary key lookup. Unparseable values use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            server_port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.server_port),
            cache_backend: lookup("CACHE_BACKEND")
                .and_then(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.cache_backend),
            cache_addr: lookup("REDIS_HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_addr),
            cache_required: lookup("CACHE_REQUIRED")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.cache_required),
            cache_timeout: parsed("CACHE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.cache_timeout),
            cache_connect_timeout: parsed("CACHE_CONNECT_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.cache_connect_timeout),
            cache_ttl: match parsed("CACHE_TTL") {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.cache_ttl,
            },
            cache_max_entries: parsed("CACHE_MAX_ENTRIES")
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .unwrap_or(defaults.cache_max_entries),
            duplicate_id_policy: lookup("DUPLICATE_ID_POLICY")
                .and_then(|v| DuplicateIdPolicy::parse(&v))
                .unwrap_or(defaults.duplicate_id_policy),
            log_format: match lookup("LOG_FORMAT").map(|v| v.trim().to_ascii_lowercase()) {
                Some(v) if v == "json" => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_backend: CacheBackend::Redis,
            cache_addr: "127.0.0.1:6379".to_string(),
            cache_required: false,
            cache_timeout: Duration::from_millis(250),
            cache_connect_timeout: Duration::from_secs(3),
            cache_ttl: None,
            cache_max_entries: 10_000,
            duplicate_id_policy: DuplicateIdPolicy::Reject,
            log_format: LogFormat::Text,
        }
    }
}
