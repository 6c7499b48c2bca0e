//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint. They only translate
//! between HTTP and [`CatalogService`] calls.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::ProductCache;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{HealthResponse, Product, StatsResponse};
use crate::service::CatalogService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Creates a new AppState with an empty store in front of `cache`.
    pub fn from_config(config: &Config, cache: Arc<dyn ProductCache>) -> Self {
        Self::new(CatalogService::from_config(config, cache))
    }
}

/// Handler for POST /products
///
/// The body is decoded as JSON regardless of its content type.
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product_json(&body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id.map_err(|_| CatalogError::Validation("Invalid ID".to_string()))?;
    let product = state.catalog.get_product(id).await?;
    Ok(Json(product))
}

/// Handler for GET /products
pub async fn list_products_handler(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.list_products().await)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.catalog.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
