//! Service Module
//!
//! The catalog operations exposed to the HTTP layer.

mod catalog;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{CatalogService, CatalogStats};
