//! Catalog Service
//!
//! Create/get/list over the product store, with the cache consulted
//! before the store on reads and populated after every store hit or write.
//! Cache failures are logged and absorbed; callers only ever see
//! validation and not-found errors.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheStats, ProductCache};
use crate::config::{Config, DuplicateIdPolicy};
use crate::error::{CacheError, CacheResult, CatalogError, Result};
use crate::models::Product;
use crate::store::{DuplicateId, ProductStore};

/// Point-in-time view of the service counters.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub products: usize,
    pub cache_backend: &'static str,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_errors: u64,
    pub cache_write_failures: u64,
    pub cache_evictions: u64,
}

// == Catalog Service ==
pub struct CatalogService {
    store: ProductStore,
    cache: Arc<dyn ProductCache>,
    /// Bound on every individual cache call
    cache_timeout: Duration,
    duplicate_policy: DuplicateIdPolicy,
    stats: CacheStats,
}

impl CatalogService {
    pub fn new(
        store: ProductStore,
        cache: Arc<dyn ProductCache>,
        cache_timeout: Duration,
        duplicate_policy: DuplicateIdPolicy,
    ) -> Self {
        Self {
            store,
            cache,
            cache_timeout,
            duplicate_policy,
            stats: CacheStats::new(),
        }
    }

    /// Creates a service with an empty store and the given cache.
    pub fn from_config(config: &Config, cache: Arc<dyn ProductCache>) -> Self {
        Self::new(
            ProductStore::new(),
            cache,
            config.cache_timeout,
            config.duplicate_id_policy,
        )
    }

    // == Create ==
    /// Decodes a JSON payload and creates the product it describes.
    pub async fn create_product_json(&self, payload: &[u8]) -> Result<Product> {
        let product = Product::from_json(payload)?;
        self.create_product(product).await
    }

    /// Appends the product to the store, then caches it on a best-effort basis.
    pub async fn create_product(&self, product: Product) -> Result<Product> {
        let created = match self.duplicate_policy {
            DuplicateIdPolicy::Reject => {
                self.store
                    .add_unique(product)
                    .await
                    .map_err(|DuplicateId(id)| {
                        CatalogError::Validation(format!("product with id {} already exists", id))
                    })?
            }
            DuplicateIdPolicy::Shadow => self.store.add(product).await,
        };

        // Under shadowing, reads return the first record with this id, so
        // that is the one the cache must hold.
        let canonical = match self.duplicate_policy {
            DuplicateIdPolicy::Reject => None,
            DuplicateIdPolicy::Shadow => self.store.get_by_id(created.id).await,
        };
        self.populate(canonical.as_ref().unwrap_or(&created)).await;

        info!(id = created.id, "Product created");
        Ok(created)
    }

    // == Get ==
    /// Returns the product from the cache when present, otherwise from the store.
    pub async fn get_product(&self, id: i64) -> Result<Product> {
        if let Some(product) = self.lookup_cached(id).await {
            return Ok(product);
        }

        let product = self
            .store
            .get_by_id(id)
            .await
            .ok_or(CatalogError::NotFound(id))?;
        self.populate(&product).await;
        Ok(product)
    }

    // == List ==
    /// Every product in creation order, read straight from the store.
    pub async fn list_products(&self) -> Vec<Product> {
        self.store.list().await
    }

    // == Stats ==
    pub async fn stats(&self) -> CatalogStats {
        CatalogStats {
            products: self.store.len().await,
            cache_backend: self.cache.backend(),
            cache_hits: self.stats.hits(),
            cache_misses: self.stats.misses(),
            cache_errors: self.stats.errors(),
            cache_write_failures: self.stats.write_failures(),
            cache_evictions: self.cache.evictions(),
        }
    }

    async fn lookup_cached(&self, id: i64) -> Option<Product> {
        let key = cache_key(id);
        match self.bounded(self.cache.get(&key)).await {
            Ok(Some(raw)) => match serde_json::from_str::<Product>(&raw) {
                Ok(product) => {
                    self.stats.record_hit();
                    debug!(id, "cache hit");
                    Some(product)
                }
                Err(err) => {
                    self.stats.record_error();
                    warn!(id, error = %err, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                self.stats.record_miss();
                debug!(id, "cache miss");
                None
            }
            Err(err) => {
                self.stats.record_error();
                warn!(id, error = %err, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn populate(&self, product: &Product) {
        let value = match product.to_json() {
            Ok(value) => value,
            Err(err) => {
                self.stats.record_write_failure();
                warn!(id = product.id, error = %err, "Could not encode product for cache");
                return;
            }
        };

        if let Err(err) = self.bounded(self.cache.put(&cache_key(product.id), value)).await {
            self.stats.record_write_failure();
            warn!(id = product.id, error = %err, "Error caching product");
        }
    }

    async fn bounded<T, F>(&self, call: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        tokio::time::timeout(self.cache_timeout, call)
            .await
            .map_err(|_| CacheError::Timeout(self.cache_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DisabledCache, MemoryCache};
    use crate::service::test_support::{CorruptCache, StallingCache, UnreachableCache};

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn service_with(cache: Arc<dyn ProductCache>) -> CatalogService {
        CatalogService::new(ProductStore::new(), cache, TIMEOUT, DuplicateIdPolicy::Reject)
    }

    fn test_product() -> Product {
        Product {
            id: 1,
            owner_id: 1,
            name: "Test Product".to_string(),
            description: "Test description".to_string(),
            price: 50.0,
            ..Product::default()
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("product {}", id),
            ..Product::default()
        }
    }

    #[tokio::test]
    async fn test_create_get_list_scenario() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));

        let created = service.create_product(test_product()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.price, 50.0);

        assert_eq!(service.get_product(1).await.unwrap(), test_product());
        assert_eq!(service.list_products().await, vec![test_product()]);
    }

    #[tokio::test]
    async fn test_create_populates_cache() {
        let cache = Arc::new(MemoryCache::new(100, None));
        let service = service_with(cache.clone());

        service.create_product(test_product()).await.unwrap();

        let raw = cache.get("1").await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Product>(&raw).unwrap(), test_product());

        service.get_product(1).await.unwrap();
        let stats = service.stats().await;
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 0);
    }

    #[tokio::test]
    async fn test_cache_hit_keeps_exact_price() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));
        let priced = Product {
            price: 2.2343294415185686e111,
            ..test_product()
        };

        service.create_product(priced.clone()).await.unwrap();
        let fetched = service.get_product(1).await.unwrap();

        assert_eq!(service.stats().await.cache_hits, 1);
        assert_eq!(fetched.price.to_bits(), priced.price.to_bits());
    }

    #[tokio::test]
    async fn test_create_json_price_matches_later_get() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));

        let created = service
            .create_product_json(br#"{"id":7,"product_price":8.421102666404143e-134}"#)
            .await
            .unwrap();
        let fetched = service.get_product(7).await.unwrap();

        assert_eq!(created.price, 8.421102666404143e-134);
        assert_eq!(fetched.price.to_bits(), created.price.to_bits());
    }

    #[tokio::test]
    async fn test_create_json_malformed_mutates_nothing() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));

        let result = service.create_product_json(br#"{"id": 1, "user_id": "#).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert!(service.list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_miss_falls_back_and_populates() {
        let store = ProductStore::new();
        store.add(product(5)).await;
        let cache = Arc::new(MemoryCache::new(100, None));
        let service = CatalogService::new(store, cache.clone(), TIMEOUT, DuplicateIdPolicy::Reject);

        assert_eq!(service.get_product(5).await.unwrap(), product(5));
        assert!(cache.get("5").await.unwrap().is_some());

        let stats = service.stats().await;
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 0);
    }

    #[tokio::test]
    async fn test_cache_hit_is_authoritative() {
        let cache = Arc::new(MemoryCache::new(100, None));
        cache
            .put("9", product(9).to_json().unwrap())
            .await
            .unwrap();
        let service = service_with(cache);

        // Not in the store; the cached copy answers the lookup.
        assert_eq!(service.get_product(9).await.unwrap(), product(9));
    }

    #[tokio::test]
    async fn test_not_found_with_empty_cache() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));
        assert_eq!(service.get_product(42).await, Err(CatalogError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_not_found_with_unreachable_cache() {
        let service = service_with(Arc::new(UnreachableCache));
        assert_eq!(service.get_product(42).await, Err(CatalogError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_unreachable_cache_is_transparent() {
        let service = service_with(Arc::new(UnreachableCache));

        let created = service.create_product(test_product()).await.unwrap();
        assert_eq!(created, test_product());
        assert_eq!(service.get_product(1).await.unwrap(), test_product());

        let stats = service.stats().await;
        assert_eq!(stats.cache_errors, 1);
        // Create and the read-path repopulation both failed to write.
        assert_eq!(stats.cache_write_failures, 2);
    }

    #[tokio::test]
    async fn test_stalling_cache_times_out_to_store() {
        let service = service_with(Arc::new(StallingCache));

        let started = std::time::Instant::now();
        service.create_product(test_product()).await.unwrap();
        assert_eq!(service.get_product(1).await.unwrap(), test_product());
        assert_eq!(service.get_product(2).await, Err(CatalogError::NotFound(2)));

        // Each cache call is cut off at the timeout.
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(service.stats().await.cache_errors, 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_falls_back() {
        let store = ProductStore::new();
        store.add(product(3)).await;
        let service = CatalogService::new(
            store,
            Arc::new(CorruptCache),
            TIMEOUT,
            DuplicateIdPolicy::Reject,
        );

        assert_eq!(service.get_product(3).await.unwrap(), product(3));
        assert_eq!(service.stats().await.cache_errors, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_reads_store() {
        let service = service_with(Arc::new(DisabledCache));
        service.create_product(product(1)).await.unwrap();

        assert_eq!(service.get_product(1).await.unwrap(), product(1));
        let stats = service.stats().await;
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_backend, "disabled");
        assert_eq!(stats.cache_evictions, 0);
    }

    #[tokio::test]
    async fn test_stats_report_cache_evictions() {
        let service = service_with(Arc::new(MemoryCache::new(2, None)));
        for id in 1..=5 {
            service.create_product(product(id)).await.unwrap();
        }

        assert_eq!(service.stats().await.cache_evictions, 3);
        // Evicted ids still come back from the store.
        assert_eq!(service.get_product(1).await.unwrap(), product(1));
    }

    #[tokio::test]
    async fn test_list_does_not_touch_cache() {
        let service = service_with(Arc::new(UnreachableCache));
        service.create_product(product(1)).await.unwrap();
        service.create_product(product(2)).await.unwrap();

        let ids: Vec<i64> = service.list_products().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(service.stats().await.cache_errors, 0);
    }

    #[tokio::test]
    async fn test_reject_policy_refuses_duplicate() {
        let service = service_with(Arc::new(MemoryCache::new(100, None)));
        service.create_product(product(1)).await.unwrap();

        let duplicate = Product {
            name: "impostor".to_string(),
            ..product(1)
        };
        let result = service.create_product(duplicate).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(service.list_products().await.len(), 1);
        assert_eq!(service.get_product(1).await.unwrap(), product(1));
    }

    #[tokio::test]
    async fn test_shadow_policy_keeps_first_record() {
        let cache = Arc::new(MemoryCache::new(100, None));
        let service = CatalogService::new(
            ProductStore::new(),
            cache.clone(),
            TIMEOUT,
            DuplicateIdPolicy::Shadow,
        );
        service.create_product(product(1)).await.unwrap();

        let shadow = Product {
            name: "shadow".to_string(),
            ..product(1)
        };
        let created = service.create_product(shadow.clone()).await.unwrap();
        assert_eq!(created, shadow);

        assert_eq!(service.list_products().await.len(), 2);
        assert_eq!(service.get_product(1).await.unwrap(), product(1));

        // The cache still holds the first record, not the shadowed one.
        let raw = cache.get("1").await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Product>(&raw).unwrap(), product(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates() {
        let service = Arc::new(service_with(Arc::new(MemoryCache::new(1000, None))));

        let handles: Vec<_> = (0..100)
            .map(|id| {
                let service = service.clone();
                tokio::spawn(async move { service.create_product(product(id)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = service.list_products().await;
        assert_eq!(listed.len(), 100);
        let mut ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..100).collect::<Vec<_>>());
        for p in &listed {
            assert_eq!(p, &product(p.id));
        }
    }
}
