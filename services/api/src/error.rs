use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shopfront_core::error::ErrorBody;

/// API error variants. The display string is the client-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ── auth ──
    #[error("Name, email, and password are required")]
    MissingSignupFields,
    #[error("Please provide a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("User with this email or username already exists")]
    UserExists,
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("UserId not provided")]
    MissingUserIdCookie,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid userId token")]
    UnknownIdentityUser,

    // ── catalog ──
    #[error("Category name is required")]
    MissingCategoryName,
    #[error("Category already exists")]
    CategoryExists,
    #[error("Subcategory name and category ID are required")]
    MissingSubCategoryFields,
    #[error("Selected category does not exist")]
    CategoryNotFound,
    #[error("Subcategory already exists under this category")]
    SubCategoryExists,
    #[error("Invalid subcategory id")]
    InvalidSubCategoryId,

    // ── products ──
    #[error("Title, variants, subcategory, and description are required")]
    MissingProductFields,
    #[error("Product ID, title, variants, subcategory, and description are required")]
    MissingEditProductFields,
    #[error("Variants must be a valid JSON array")]
    InvalidVariantsJson,
    #[error("At least one variant is required")]
    NoVariants,
    #[error("Each variant must have RAM, price, and quantity")]
    InvalidVariant,
    #[error("Selected subcategory does not exist")]
    SubCategoryNotFound,
    #[error("Existing images must be a valid JSON array")]
    InvalidExistingImages,
    #[error("Invalid product id")]
    InvalidProductId,
    #[error("Product not found")]
    ProductNotFound,

    // ── uploads ──
    #[error("Invalid multipart form data")]
    InvalidMultipart(String),
    #[error("Only image files are allowed")]
    UnsupportedImageType,
    #[error("Each image must be at most 5MB")]
    ImageTooLarge,
    #[error("At most 5 images can be uploaded")]
    TooManyImages,

    // ── wishlist ──
    #[error("Product ID is required")]
    MissingProductId,
    #[error("Product already in wishlist")]
    AlreadyInWishlist,
    #[error("Wishlist not found")]
    WishlistNotFound,
    #[error("Product not found in wishlist")]
    NotInWishlist,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSignupFields
            | Self::MissingCredentials
            | Self::MissingCategoryName
            | Self::MissingSubCategoryFields
            | Self::MissingProductFields
            | Self::MissingEditProductFields
            | Self::MissingProductId => "MISSING_FIELDS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::UserExists => "USER_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingUserIdCookie => "NO_USER_ID",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::UnknownIdentityUser => "INVALID_USER_ID",
            Self::CategoryExists => "CATEGORY_EXISTS",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::SubCategoryExists => "SUBCATEGORY_EXISTS",
            Self::InvalidSubCategoryId => "INVALID_SUBCATEGORY_ID",
            Self::InvalidVariantsJson | Self::NoVariants | Self::InvalidVariant => {
                "INVALID_VARIANTS"
            }
            Self::SubCategoryNotFound => "SUBCATEGORY_NOT_FOUND",
            Self::InvalidExistingImages => "INVALID_EXISTING_IMAGES",
            Self::InvalidProductId => "INVALID_PRODUCT_ID",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::InvalidMultipart(_) => "INVALID_MULTIPART",
            Self::UnsupportedImageType | Self::ImageTooLarge | Self::TooManyImages => {
                "INVALID_UPLOAD"
            }
            Self::AlreadyInWishlist => "ALREADY_IN_WISHLIST",
            Self::WishlistNotFound => "WISHLIST_NOT_FOUND",
            Self::NotInWishlist => "NOT_IN_WISHLIST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::MissingUserIdCookie
            | Self::InvalidRefreshToken
            | Self::UnknownIdentityUser => StatusCode::UNAUTHORIZED,
            Self::UserExists
            | Self::CategoryExists
            | Self::SubCategoryExists
            | Self::AlreadyInWishlist => StatusCode::CONFLICT,
            Self::ProductNotFound | Self::WishlistNotFound | Self::NotInWishlist => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorBody::new(self.to_string()).with_code(self.kind());
        match &self {
            // Only 500s are logged here; TraceLayer records every request.
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
                body = body.with_detail(format!("{e:#}"));
            }
            Self::InvalidMultipart(detail) => body = body.with_detail(detail),
            _ => {}
        }
        body.into_response_with(status)
    }
}
