use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use shopfront_auth_types::guard::{verify_admin, verify_token, verify_user};
use shopfront_core::health::{health, healthz, readyz};
use shopfront_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};
use shopfront_domain::catalog::MAX_PRODUCT_IMAGES;

use crate::domain::repository::Repositories;
use crate::domain::types::MAX_IMAGE_BYTES;
use crate::handlers::{
    auth::{logout, refresh, signin, signup},
    catalog::{create_category, create_subcategory, list_categories, list_subcategories},
    index::{admin_index, auth_index, user_index},
    product::{create_product, get_product, list_products, update_product},
    wishlist::{add_to_wishlist, clear_wishlist, get_wishlist, remove_from_wishlist},
};
use crate::state::AppState;

/// Room for a full set of images plus the text fields.
const MAX_BODY_BYTES: usize = MAX_PRODUCT_IMAGES * MAX_IMAGE_BYTES + 1024 * 1024;

fn cors_layer<R: Repositories>(state: &AppState<R>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(state.cors_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router<R: Repositories>(state: AppState<R>) -> Router {
    let verifier = state.access_verifier();

    let public = Router::new()
        // Health
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth", get(auth_index))
        .route("/api/auth/signup", post(signup::<R>))
        .route("/api/auth/signin", post(signin::<R>))
        .route("/api/auth/refresh", post(refresh::<R>))
        .route("/api/auth/logout", post(logout::<R>))
        // Index documents
        .route("/api/admin", get(admin_index))
        .route("/api/user", get(user_index));

    let admin = Router::new()
        .route(
            "/api/admin/categories",
            get(list_categories::<R>).post(create_category::<R>),
        )
        .route(
            "/api/admin/subcategories",
            get(list_subcategories::<R>).post(create_subcategory::<R>),
        )
        .route(
            "/api/admin/products",
            get(list_products::<R>).post(create_product::<R>),
        )
        .route(
            "/api/admin/product/{id}",
            get(get_product::<R>).put(update_product::<R>),
        )
        .route_layer(from_fn(verify_admin))
        .route_layer(from_fn_with_state(verifier.clone(), verify_token));

    let user = Router::new()
        .route("/api/user/categories", get(list_categories::<R>))
        .route("/api/user/subcategories", get(list_subcategories::<R>))
        .route("/api/user/products", get(list_products::<R>))
        .route("/api/user/product/{id}", get(get_product::<R>))
        .route(
            "/api/user/wishlist",
            get(get_wishlist::<R>)
                .post(add_to_wishlist::<R>)
                .delete(clear_wishlist::<R>),
        )
        .route(
            "/api/user/wishlist/{product_id}",
            delete(remove_from_wishlist::<R>),
        )
        .route_layer(from_fn(verify_user))
        .route_layer(from_fn_with_state(verifier, verify_token));

    let cors = cors_layer(&state);
    let uploads = ServeDir::new(state.images.dir());

    public
        .merge(admin)
        .merge(user)
        .with_state(state)
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
}
