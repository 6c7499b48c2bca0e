//! Product record
//!
//! The single entity of the catalog, plus its JSON wire encoding.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// A catalog product.
///
/// Every field is optional on input and defaults to zero / empty.
/// Output always uses the wire names (`user_id`, `product_name`, ...);
/// the plain field names are accepted as aliases on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    /// Reference to an external user; not checked
    #[serde(rename = "user_id", alias = "owner_id")]
    pub owner_id: i64,
    #[serde(rename = "product_name", alias = "name")]
    pub name: String,
    #[serde(rename = "product_description", alias = "description")]
    pub description: String,
    /// Image references in insertion order
    #[serde(rename = "product_images", alias = "images")]
    pub images: Vec<String>,
    /// Filled in by the image-compression pipeline
    #[serde(rename = "compressed_product_images", alias = "compressed_images")]
    pub compressed_images: Vec<String>,
    #[serde(rename = "product_price", alias = "price")]
    pub price: f64,
}

impl Product {
    /// Decodes a create payload. Anything that is not a JSON object of
    /// the right shape is a validation error.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|err| CatalogError::Validation(err.to_string()))
    }

    /// Encodes the product the way it is stored in the cache.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
