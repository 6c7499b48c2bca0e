//! Store Module
//!
//! The canonical product collection.

mod product_store;

pub use product_store::{DuplicateId, ProductStore};
