//! Error types for the catalog service
//!
//! Three families: caller-visible catalog errors, cache errors that the
//! service absorbs, and startup errors that terminate the process.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Catalog Error Enum ==
/// Errors visible to callers of the catalog service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Malformed create input, or a duplicate id under the reject policy
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No product with this id exists in the cache or the store
    #[error("Product not found: {0}")]
    NotFound(i64),
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Convenience Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

// == Cache Error Enum ==
/// Failures of the cache backend. Never surfaced to catalog callers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend unreachable or the command failed
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured timeout
    #[error("Cache call timed out after {0:?}")]
    Timeout(Duration),

    /// The backend refused the entry (size limits)
    #[error("Cache rejected entry: {0}")]
    Rejected(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Result type for cache backend operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Startup Error Enum ==
/// Fatal errors raised while bringing the service up.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The cache backend is required but could not be reached
    #[error("Could not connect to cache at {addr}: {source}")]
    CacheConnectivity {
        addr: String,
        #[source]
        source: CacheError,
    },

    /// The HTTP listener could not be bound
    #[error("Could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
