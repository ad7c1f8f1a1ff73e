//! Persistence ports.
//!
//! Methods return `impl Future + Send` rather than `async fn` so that generic
//! axum handlers over [`Repositories`] stay `Send`. Implementations may still
//! be written with `async fn`.

use std::future::Future;

use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};

use crate::domain::types::{
    Category, ImageUpload, NewUser, Product, ProductDraft, ProductQuery, SubCategory, User,
    Wishlist,
};
use crate::error::ApiError;

pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, ApiError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, ApiError>> + Send;

    /// Whether any user already has this email or this name.
    fn exists_by_email_or_name(
        &self,
        email: &str,
        name: &str,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    /// Insert a user. Fails with [`ApiError::UserExists`] on a uniqueness clash.
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, ApiError>> + Send;

    /// Overwrite (or unset) the stored refresh token.
    fn set_refresh_token(
        &self,
        id: UserId,
        token: Option<String>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Unset the refresh token of whichever user holds exactly `token`.
    /// Returns `true` if a user matched.
    fn clear_refresh_token_matching(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;
}

pub trait CategoryRepository: Send + Sync {
    /// All categories, sorted by name.
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    fn find_by_id(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<Category>, ApiError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[CategoryId],
    ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, ApiError>> + Send;

    /// Insert a category. Fails with [`ApiError::CategoryExists`] on a name clash.
    fn create(&self, name: &str) -> impl Future<Output = Result<Category, ApiError>> + Send;
}

pub trait SubCategoryRepository: Send + Sync {
    /// All subcategories, sorted by name.
    fn list(&self) -> impl Future<Output = Result<Vec<SubCategory>, ApiError>> + Send;

    fn find_by_id(
        &self,
        id: SubCategoryId,
    ) -> impl Future<Output = Result<Option<SubCategory>, ApiError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[SubCategoryId],
    ) -> impl Future<Output = Result<Vec<SubCategory>, ApiError>> + Send;

    fn find_in_category(
        &self,
        name: &str,
        category_id: CategoryId,
    ) -> impl Future<Output = Result<Option<SubCategory>, ApiError>> + Send;

    /// Insert a subcategory. Fails with [`ApiError::SubCategoryExists`] on a
    /// `(name, category)` clash.
    fn create(
        &self,
        name: &str,
        category_id: CategoryId,
    ) -> impl Future<Output = Result<SubCategory, ApiError>> + Send;
}

pub trait ProductRepository: Send + Sync {
    /// One page of products matching `query`, newest first, plus the total
    /// number of matches.
    fn list(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<(Vec<Product>, u64), ApiError>> + Send;

    fn find_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    fn create(&self, draft: ProductDraft) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// Replace every mutable field. Returns `None` if the product is gone.
    fn update(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;
}

pub trait WishlistRepository: Send + Sync {
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Wishlist>, ApiError>> + Send;

    /// Return the user's wishlist, creating an empty one first if needed.
    fn find_or_create(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Wishlist, ApiError>> + Send;

    /// Append a product. Returns `false` if it was already present.
    fn add_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    /// Remove a product. Returns `false` if it was not present.
    fn remove_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    /// Remove every item and return the emptied wishlist.
    fn clear(
        &self,
        wishlist_id: WishlistId,
    ) -> impl Future<Output = Result<Wishlist, ApiError>> + Send;
}

/// Destination for uploaded product images.
pub trait ImageStore: Send + Sync {
    /// Persist every upload, returning the generated filenames in order.
    fn save_all(
        &self,
        uploads: Vec<ImageUpload>,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Delete files written by [`save_all`](Self::save_all). Best effort.
    fn remove_all(&self, names: &[String]) -> impl Future<Output = ()> + Send;
}

/// Every repository the service needs, constructed once at startup.
pub trait Repositories: Clone + Send + Sync + 'static {
    type Users: UserRepository + 'static;
    type Categories: CategoryRepository + 'static;
    type SubCategories: SubCategoryRepository + 'static;
    type Products: ProductRepository + 'static;
    type Wishlists: WishlistRepository + 'static;

    fn users(&self) -> Self::Users;
    fn categories(&self) -> Self::Categories;
    fn subcategories(&self) -> Self::SubCategories;
    fn products(&self) -> Self::Products;
    fn wishlists(&self) -> Self::Wishlists;
}
