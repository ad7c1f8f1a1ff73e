use std::collections::HashMap;

use shopfront_domain::id::{ProductId, UserId};

use crate::domain::repository::{
    CategoryRepository, ProductRepository, SubCategoryRepository, WishlistRepository,
};
use crate::domain::types::{PopulatedWishlist, Wishlist};
use crate::error::ApiError;
use crate::usecase::catalog::populate_products;

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.trim()
        .parse::<ProductId>()
        .map_err(|_| ApiError::InvalidProductId)
}

/// Wishlist operations, all scoped to one user id.
pub struct WishlistUseCase<W, P, S, C>
where
    W: WishlistRepository,
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    pub wishlists: W,
    pub products: P,
    pub subcategories: S,
    pub categories: C,
}

impl<W, P, S, C> WishlistUseCase<W, P, S, C>
where
    W: WishlistRepository,
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    /// Join products in wishlist order. Items whose product is gone are dropped.
    async fn populate(&self, wishlist: Wishlist) -> Result<PopulatedWishlist, ApiError> {
        let products = self.products.find_by_ids(&wishlist.product_ids).await?;
        let mut by_id: HashMap<_, _> =
            populate_products(&self.subcategories, &self.categories, products)
                .await?
                .into_iter()
                .map(|p| (p.product.id, p))
                .collect();
        let items = wishlist
            .product_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        Ok(PopulatedWishlist { wishlist, items })
    }

    // ── Add ──────────────────────────────────────────────────────────────────

    pub async fn add(
        &self,
        user_id: UserId,
        raw_product_id: Option<&str>,
    ) -> Result<PopulatedWishlist, ApiError> {
        let raw = raw_product_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingProductId)?;
        let product_id = parse_product_id(raw)?;
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(ApiError::ProductNotFound);
        }

        let wishlist = self.wishlists.find_or_create(user_id).await?;
        if !self.wishlists.add_item(wishlist.id, product_id).await? {
            return Err(ApiError::AlreadyInWishlist);
        }
        tracing::debug!(%user_id, %product_id, "wishlist item added");

        let wishlist = self
            .wishlists
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::WishlistNotFound)?;
        self.populate(wishlist).await
    }

    // ── Get ──────────────────────────────────────────────────────────────────

    /// `None` when the user has never added anything.
    pub async fn get(&self, user_id: UserId) -> Result<Option<PopulatedWishlist>, ApiError> {
        match self.wishlists.find_by_user(user_id).await? {
            Some(wishlist) => Ok(Some(self.populate(wishlist).await?)),
            None => Ok(None),
        }
    }

    // ── Remove ───────────────────────────────────────────────────────────────

    pub async fn remove(
        &self,
        user_id: UserId,
        raw_product_id: &str,
    ) -> Result<PopulatedWishlist, ApiError> {
        let product_id = parse_product_id(raw_product_id)?;
        let wishlist = self
            .wishlists
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::WishlistNotFound)?;
        if !self.wishlists.remove_item(wishlist.id, product_id).await? {
            return Err(ApiError::NotInWishlist);
        }

        let wishlist = self
            .wishlists
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::WishlistNotFound)?;
        self.populate(wishlist).await
    }

    // ── Clear ────────────────────────────────────────────────────────────────

    pub async fn clear(&self, user_id: UserId) -> Result<Wishlist, ApiError> {
        let wishlist = self
            .wishlists
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::WishlistNotFound)?;
        self.wishlists.clear(wishlist.id).await
    }
}
