//! Catalog Service - product records over HTTP
//!
//! An in-memory product store with a cache-aside layer (Redis or
//! in-process) in front of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use cache::build_cache;
pub use config::Config;
pub use service::CatalogService;
