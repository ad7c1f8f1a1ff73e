//! Wire types as the API renders them.

use serde::{Deserialize, Serialize};

use shopfront_domain::catalog::Variant;
use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};
use shopfront_domain::pagination::PageInfo;
use shopfront_domain::user::Role;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub pagination: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionData {
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub variants: Vec<Variant>,
    pub images: Vec<String>,
    pub subcategory: Option<SubCategory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<PageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product: Product,
}

/// `id` is absent until the user first adds a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: Option<WishlistId>,
    pub user: UserId,
    pub items: Vec<WishlistItem>,
}

/// Listing filter; unset fields are left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub subcategory: Option<SubCategoryId>,
}

impl ProductFilter {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(subcategory) = self.subcategory {
            query.push(("subcategory", subcategory.to_string()));
        }
        query
    }
}

/// An image file to attach to a product form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Product create/edit payload, sent as multipart.
#[derive(Debug, Clone)]
pub struct ProductUpload {
    pub title: String,
    pub description: String,
    pub subcategory: SubCategoryId,
    pub variants: Vec<Variant>,
    /// Edit only: filenames to keep. `None` keeps or replaces the whole set
    /// depending on whether new images are attached.
    pub existing_images: Option<Vec<String>>,
    pub images: Vec<ImageFile>,
}
