//! Request guards: access-token verification and role gates.
//!
//! Compose with axum's middleware helpers:
//!
//! ```ignore
//! Router::new()
//!     .route("/categories", post(create_category))
//!     .route_layer(from_fn(verify_admin))
//!     .route_layer(from_fn_with_state(verifier, verify_token))
//! ```
//!
//! `verify_token` must run first; it inserts [`AuthUser`] into the request
//! extensions, which the role gates and the [`AuthUser`] extractor read.

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use http::request::Parts;
use http::{StatusCode, header};

use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;

use crate::cookie::ACCESS_TOKEN;
use crate::token::{AccessVerifier, AuthError};

/// Identity of the authenticated caller, decoded from the access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Rejections produced by the guards and the [`AuthUser`] extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Access token required")]
    NoToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Authentication required")]
    NoUser,
    #[error("{}", forbidden_message(.0))]
    InsufficientPermissions(Role),
}

fn forbidden_message(required: &Role) -> &'static str {
    match required {
        Role::Admin => "Admin access required",
        Role::User => "User access required",
    }
}

impl AuthRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoToken => "NO_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::NoUser => "NO_USER",
            Self::InsufficientPermissions(_) => "INSUFFICIENT_PERMISSIONS",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired => Self::TokenExpired,
            AuthError::InvalidSignature | AuthError::Malformed => Self::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
            "code": self.kind(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

/// Pull the access token from the `accessToken` cookie, falling back to
/// `Authorization: Bearer <token>`. The cookie wins when both are present.
fn extract_token(req: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(req.headers());
    if let Some(cookie) = jar.get(ACCESS_TOKEN).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Verify the access token and attach [`AuthUser`] to the request.
pub async fn verify_token(
    State(verifier): State<AccessVerifier>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_token(&req).ok_or(AuthRejection::NoToken)?;
    let info = verifier.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        AuthRejection::from(e)
    })?;

    req.extensions_mut().insert(AuthUser {
        id: info.user_id,
        email: info.email,
        role: info.role,
    });
    Ok(next.run(req).await)
}

fn require_role(req: &Request, required: Role) -> Result<(), AuthRejection> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthRejection::NoUser)?;
    if user.role.grants(required) {
        Ok(())
    } else {
        Err(AuthRejection::InsufficientPermissions(required))
    }
}

/// Allow only admins. Must be layered inside [`verify_token`].
pub async fn verify_admin(req: Request, next: Next) -> Result<Response, AuthRejection> {
    require_role(&req, Role::Admin)?;
    Ok(next.run(req).await)
}

/// Allow users and admins. Must be layered inside [`verify_token`].
pub async fn verify_user(req: Request, next: Next) -> Result<Response, AuthRejection> {
    require_role(&req, Role::User)?;
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    // Read synchronously and return a 'static future; `async fn` here trips
    // lifetime capture rules against axum-core's `impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts.extensions.get::<AuthUser>().cloned();
        async move { user.ok_or(AuthRejection::NoUser) }
    }
}
