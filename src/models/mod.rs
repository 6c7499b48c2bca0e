//! Data models for the catalog service
//!
//! The product entity and the bodies of the operational endpoints.

pub mod product;
pub mod responses;

pub use product::Product;
pub use responses::{HealthResponse, StatsResponse};
