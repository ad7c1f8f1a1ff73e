use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use shopfront_auth_types::token::{
    ACCESS_TOKEN_EXP, AccessClaims, AccessVerifier, AuthError, IDENTITY_TOKEN_EXP, IdentityClaims,
    REFRESH_TOKEN_EXP, validate_identity_token,
};
use shopfront_domain::id::UserId;

use crate::domain::types::User;
use crate::error::ApiError;

/// Signing secrets for the three token kinds.
#[derive(Clone)]
pub struct TokenService {
    access_secret: Arc<str>,
    refresh_secret: Arc<str>,
    identity_secret: Arc<str>,
}

/// Freshly minted tokens for one user.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
    pub identity_token: String,
}

/// Refresh-token claims: the access claims plus a `jti` so two tokens minted
/// in the same second still differ.
#[derive(Serialize)]
struct RefreshClaims<'a> {
    #[serde(flatten)]
    claims: &'a AccessClaims,
    jti: String,
}

fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, ApiError> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("sign jwt")?;
    Ok(token)
}

impl TokenService {
    pub fn new(
        access_secret: impl Into<Arc<str>>,
        refresh_secret: impl Into<Arc<str>>,
        identity_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            identity_secret: identity_secret.into(),
        }
    }

    /// Mint access, refresh and identity tokens for `user`.
    pub fn issue(&self, user: &User) -> Result<IssuedTokens, ApiError> {
        let iat = now_secs();
        let access_token_exp = iat + ACCESS_TOKEN_EXP;

        let access = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat,
            exp: access_token_exp,
        };
        let refresh = AccessClaims {
            exp: iat + REFRESH_TOKEN_EXP,
            ..access.clone()
        };
        let refresh = RefreshClaims {
            claims: &refresh,
            jti: Uuid::now_v7().to_string(),
        };
        let identity = IdentityClaims {
            sub: user.id.to_string(),
            iat,
            exp: iat + IDENTITY_TOKEN_EXP,
        };

        Ok(IssuedTokens {
            access_token: sign(&access, &self.access_secret)?,
            access_token_exp,
            refresh_token: sign(&refresh, &self.refresh_secret)?,
            identity_token: sign(&identity, &self.identity_secret)?,
        })
    }

    /// Verifier for the `verify_token` middleware.
    pub fn verifier(&self) -> AccessVerifier {
        AccessVerifier::new(Arc::clone(&self.access_secret))
    }

    /// Decode the `userId` cookie value.
    pub fn verify_identity(&self, token: &str) -> Result<UserId, AuthError> {
        validate_identity_token(token, &self.identity_secret)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}
