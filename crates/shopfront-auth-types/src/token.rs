//! JWT claims and validation.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;

/// Access-token JWT lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_EXP: u64 = 15 * 60;

/// Refresh-token JWT lifetime in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 7 * 24 * 60 * 60;

/// Identity (`userId`) token JWT lifetime in seconds (7 days).
pub const IDENTITY_TOKEN_EXP: u64 = 7 * 24 * 60 * 60;

/// Claims carried by access and refresh tokens.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `sub` | user id (UUID string) |
/// | `email` | email at issue time |
/// | `role` | `"admin"` or `"user"` |
/// | `iat` / `exp` | seconds since UNIX epoch |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// Claims carried by the identity token stored in the `userId` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// User identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub access_token_exp: u64,
}

/// Errors returned by token validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

// ── Core decode ──────────────────────────────────────────────────────────────

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
pub fn validate_token<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate an access token, returning parsed identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims: AccessClaims = validate_token(token, secret)?;
    let user_id = claims
        .sub
        .parse::<UserId>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        email: claims.email,
        role: claims.role,
        access_token_exp: claims.exp,
    })
}

/// Validate an identity token, returning the user id it names.
pub fn validate_identity_token(token: &str, secret: &str) -> Result<UserId, AuthError> {
    let claims: IdentityClaims = validate_token(token, secret)?;
    claims.sub.parse::<UserId>().map_err(|_| AuthError::Malformed)
}

/// Access-token verifier handed to the `verify_token` middleware as its state.
#[derive(Clone)]
pub struct AccessVerifier {
    secret: Arc<str>,
}

impl AccessVerifier {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<TokenInfo, AuthError> {
        validate_access_token(token, &self.secret)
    }
}

impl std::fmt::Debug for AccessVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessVerifier").finish_non_exhaustive()
    }
}
