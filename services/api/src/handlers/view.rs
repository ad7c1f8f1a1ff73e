//! JSON shapes returned inside the response envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopfront_core::serde::to_rfc3339_ms;
use shopfront_domain::catalog::Variant;
use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};
use shopfront_domain::user::Role;

use crate::domain::types::{
    Category, PopulatedProduct, PopulatedSubCategory, PopulatedWishlist, User, Wishlist,
};

/// Public view of a user. Never carries the password hash or refresh token.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryView {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryView {
    pub id: SubCategoryId,
    pub name: String,
    /// `null` if the parent category has since disappeared.
    pub category: Option<CategoryView>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedSubCategory> for SubCategoryView {
    fn from(p: PopulatedSubCategory) -> Self {
        Self {
            id: p.subcategory.id,
            name: p.subcategory.name,
            category: p.category.map(CategoryView::from),
            created_at: p.subcategory.created_at,
            updated_at: p.subcategory.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub variants: Vec<Variant>,
    pub images: Vec<String>,
    pub subcategory: Option<SubCategoryView>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedProduct> for ProductView {
    fn from(p: PopulatedProduct) -> Self {
        Self {
            id: p.product.id,
            title: p.product.title,
            description: p.product.description,
            variants: p.product.variants,
            images: p.product.images,
            subcategory: p.subcategory.map(SubCategoryView::from),
            created_at: p.product.created_at,
            updated_at: p.product.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistItemView {
    pub product: ProductView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub id: WishlistId,
    pub user: UserId,
    pub items: Vec<WishlistItemView>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedWishlist> for WishlistView {
    fn from(p: PopulatedWishlist) -> Self {
        Self {
            id: p.wishlist.id,
            user: p.wishlist.user_id,
            items: p
                .items
                .into_iter()
                .map(|product| WishlistItemView {
                    product: product.into(),
                })
                .collect(),
            created_at: p.wishlist.created_at,
            updated_at: p.wishlist.updated_at,
        }
    }
}

/// A wishlist rendered without joining products. Only used once it is empty.
impl From<Wishlist> for WishlistView {
    fn from(w: Wishlist) -> Self {
        Self {
            id: w.id,
            user: w.user_id,
            items: Vec::new(),
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Placeholder for a user who has no wishlist yet.
#[derive(Debug, Serialize)]
pub struct EmptyWishlistView {
    pub user: UserId,
    pub items: Vec<WishlistItemView>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WishlistBody {
    Existing(WishlistView),
    Empty(EmptyWishlistView),
}
