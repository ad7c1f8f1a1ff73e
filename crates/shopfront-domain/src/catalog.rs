//! Catalog domain types.

use serde::{Deserialize, Serialize};

/// A purchasable configuration of a product with its own price and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub ram: String,
    pub price: f64,
    pub quantity: u32,
}

/// Maximum number of images accepted per product upload.
pub const MAX_PRODUCT_IMAGES: usize = 5;
