//! Product Store Module
//!
//! Canonical in-memory collection of products. Append-only; insertion
//! order is preserved and the first record with a given id wins on read.

use tokio::sync::RwLock;

use crate::models::Product;

/// Returned by [`ProductStore::add_unique`] when the id is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateId(pub i64);

// == Product Store ==
/// The source of truth for product data.
///
/// A single lock guards the whole collection: appends take the write
/// lock, scans take the read lock.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<Vec<Product>>,
}

impl ProductStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Add ==
    /// Appends the product without checking for an existing id.
    pub async fn add(&self, product: Product) -> Product {
        let mut products = self.products.write().await;
        products.push(product.clone());
        product
    }

    // == Add Unique ==
    /// Appends the product only if no record with its id exists.
    ///
    /// The check and the append happen under one write lock.
    pub async fn add_unique(&self, product: Product) -> Result<Product, DuplicateId> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(DuplicateId(product.id));
        }
        products.push(product.clone());
        Ok(product)
    }

    // == Get By Id ==
    /// Returns the first record with the given id.
    pub async fn get_by_id(&self, id: i64) -> Option<Product> {
        let products = self.products.read().await;
        products.iter().find(|p| p.id == id).cloned()
    }

    // == List ==
    /// Returns every record in insertion order.
    pub async fn list(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }
}
