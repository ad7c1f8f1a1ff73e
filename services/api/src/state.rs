use axum::http::HeaderValue;

use shopfront_auth_types::cookie::CookiePolicy;
use shopfront_auth_types::token::AccessVerifier;

use crate::domain::repository::Repositories;
use crate::infra::password::PasswordHasher;
use crate::infra::upload::DiskImageStore;
use crate::usecase::token::TokenService;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState<R: Repositories> {
    pub repos: R,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
    pub cookies: CookiePolicy,
    pub images: DiskImageStore,
    pub cors_origin: HeaderValue,
}

impl<R: Repositories> AppState<R> {
    pub fn user_repo(&self) -> R::Users {
        self.repos.users()
    }

    pub fn category_repo(&self) -> R::Categories {
        self.repos.categories()
    }

    pub fn subcategory_repo(&self) -> R::SubCategories {
        self.repos.subcategories()
    }

    pub fn product_repo(&self) -> R::Products {
        self.repos.products()
    }

    pub fn wishlist_repo(&self) -> R::Wishlists {
        self.repos.wishlists()
    }

    pub fn image_store(&self) -> DiskImageStore {
        self.images.clone()
    }

    pub fn access_verifier(&self) -> AccessVerifier {
        self.tokens.verifier()
    }
}
