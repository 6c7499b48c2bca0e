//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `POST /products` - Create a product
//! - `GET /products` - List products
//! - `GET /products/:id` - Fetch a product by id
//! - `GET /stats` - Cache and store counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
