use axum::body::Bytes;
use chrono::{DateTime, Utc};

use shopfront_domain::catalog::Variant;
use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};
use shopfront_domain::pagination::PageRequest;
use shopfront_domain::user::Role;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum accepted size of one uploaded image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub role: Role,
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain that is neither its first nor its last character.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subcategory with its parent category resolved.
#[derive(Debug, Clone)]
pub struct PopulatedSubCategory {
    pub subcategory: SubCategory,
    pub category: Option<Category>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub variants: Vec<Variant>,
    pub images: Vec<String>,
    pub subcategory_id: SubCategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated product fields, ready to persist.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub variants: Vec<Variant>,
    pub subcategory_id: SubCategoryId,
    pub images: Vec<String>,
}

/// Product with subcategory and category resolved.
#[derive(Debug, Clone)]
pub struct PopulatedProduct {
    pub product: Product,
    pub subcategory: Option<PopulatedSubCategory>,
}

/// Listing filter for products.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: PageRequest,
    /// Case-insensitive title prefix.
    pub search: Option<String>,
    pub subcategory: Option<SubCategoryId>,
}

/// An uploaded image file, validated but not yet written anywhere.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

// ── Wishlist ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Wishlist {
    pub id: WishlistId,
    pub user_id: UserId,
    /// Products in insertion order; never contains duplicates.
    pub product_ids: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PopulatedWishlist {
    pub wishlist: Wishlist,
    pub items: Vec<PopulatedProduct>,
}
