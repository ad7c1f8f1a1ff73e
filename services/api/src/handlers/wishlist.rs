use axum::extract::State;
use serde::Deserialize;

use shopfront_auth_types::guard::AuthUser;
use shopfront_core::envelope::Envelope;
use shopfront_core::extract::{Json, Path};

use crate::domain::repository::Repositories;
use crate::error::ApiError;
use crate::handlers::view::{EmptyWishlistView, WishlistBody, WishlistView};
use crate::state::AppState;
use crate::usecase::wishlist::WishlistUseCase;

type StateWishlistUseCase<R> = WishlistUseCase<
    <R as Repositories>::Wishlists,
    <R as Repositories>::Products,
    <R as Repositories>::SubCategories,
    <R as Repositories>::Categories,
>;

fn usecase<R: Repositories>(state: &AppState<R>) -> StateWishlistUseCase<R> {
    WishlistUseCase {
        wishlists: state.wishlist_repo(),
        products: state.product_repo(),
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
    }
}

// ── POST /api/user/wishlist ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    #[serde(default)]
    pub product_id: Option<String>,
}

pub async fn add_to_wishlist<R: Repositories>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<Envelope<WishlistView>, ApiError> {
    let wishlist = usecase(&state)
        .add(user.id, body.product_id.as_deref())
        .await?;
    Ok(Envelope::ok(wishlist.into(), "Product added to wishlist"))
}

// ── GET /api/user/wishlist ───────────────────────────────────────────────────

pub async fn get_wishlist<R: Repositories>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> Result<Envelope<WishlistBody>, ApiError> {
    let body = match usecase(&state).get(user.id).await? {
        Some(wishlist) => WishlistBody::Existing(wishlist.into()),
        None => WishlistBody::Empty(EmptyWishlistView {
            user: user.id,
            items: Vec::new(),
        }),
    };
    Ok(Envelope::ok(body, "Wishlist retrieved successfully"))
}

// ── DELETE /api/user/wishlist/{productId} ────────────────────────────────────

pub async fn remove_from_wishlist<R: Repositories>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Path(product_id): Path<String>,
) -> Result<Envelope<WishlistView>, ApiError> {
    let wishlist = usecase(&state).remove(user.id, &product_id).await?;
    Ok(Envelope::ok(wishlist.into(), "Product removed from wishlist"))
}

// ── DELETE /api/user/wishlist ────────────────────────────────────────────────

pub async fn clear_wishlist<R: Repositories>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> Result<Envelope<WishlistView>, ApiError> {
    let wishlist = usecase(&state).clear(user.id).await?;
    Ok(Envelope::ok(wishlist.into(), "Wishlist cleared successfully"))
}
