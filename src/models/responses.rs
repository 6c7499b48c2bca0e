//! Response DTOs for the catalog API
//!
//! Bodies of the operational endpoints. Product bodies are the
//! [`Product`](super::Product) encoding itself.

use serde::Serialize;

use crate::service::CatalogStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of records in the product store
    pub products: usize,
    /// Active cache backend name
    pub cache_backend: String,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Failed or timed-out cache reads
    pub cache_errors: u64,
    pub cache_write_failures: u64,
    /// Live entries the backend dropped to stay within capacity
    pub cache_evictions: u64,
    /// cache_hits / (cache_hits + cache_misses + cache_errors)
    pub hit_rate: f64,
}

impl From<CatalogStats> for StatsResponse {
    fn from(stats: CatalogStats) -> Self {
        let lookups = stats.cache_hits + stats.cache_misses + stats.cache_errors;
        let hit_rate = if lookups > 0 {
            stats.cache_hits as f64 / lookups as f64
        } else {
            0.0
        };
        Self {
            products: stats.products,
            cache_backend: stats.cache_backend.to_string(),
            cache_hits: stats.cache_hits,
            cache_misses: stats.cache_misses,
            cache_errors: stats.cache_errors,
            cache_write_failures: stats.cache_write_failures,
            cache_evictions: stats.cache_evictions,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
