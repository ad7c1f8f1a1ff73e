//! Token helpers for integration tests.
//!
//! `TestAuth` mints real signed tokens so requests travel through the same
//! `verify_token` guard as production traffic.

use std::time::{SystemTime, UNIX_EPOCH};

use http::{HeaderName, HeaderValue, header};
use jsonwebtoken::{EncodingKey, Header, encode};

use shopfront_auth_types::cookie::{ACCESS_TOKEN, USER_ID};
use shopfront_auth_types::token::{
    ACCESS_TOKEN_EXP, AccessClaims, IDENTITY_TOKEN_EXP, IdentityClaims,
};
use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;

/// Secret shared by tests that build an app state and mint tokens against it.
pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";
pub const TEST_USERID_SECRET: &str = "test-userid-secret";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Identity to impersonate in a test request.
#[derive(Debug, Clone)]
pub struct TestAuth {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl TestAuth {
    pub fn new(user_id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    pub fn admin() -> Self {
        Self::new(UserId::new(), "admin@shopfront.test", Role::Admin)
    }

    pub fn user() -> Self {
        Self::new(UserId::new(), "user@shopfront.test", Role::User)
    }

    /// Access token signed with `secret`, valid for the usual 15 minutes.
    pub fn access_token(&self, secret: &str) -> String {
        self.access_token_expiring(secret, (now_secs() + ACCESS_TOKEN_EXP) as i64)
    }

    /// Access token with an explicit `exp`, e.g. in the past to exercise expiry.
    pub fn access_token_expiring(&self, secret: &str, exp: i64) -> String {
        let claims = AccessClaims {
            sub: self.user_id.to_string(),
            email: self.email.clone(),
            role: self.role,
            iat: now_secs(),
            exp: exp.max(0) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode test access token")
    }

    /// Identity token for the `userId` cookie.
    pub fn identity_token(&self, secret: &str) -> String {
        let claims = IdentityClaims {
            sub: self.user_id.to_string(),
            iat: now_secs(),
            exp: now_secs() + IDENTITY_TOKEN_EXP,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode test identity token")
    }

    /// `Cookie: accessToken=<token>` header.
    pub fn cookie_header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let value = format!("{ACCESS_TOKEN}={}", self.access_token(secret));
        (
            header::COOKIE,
            HeaderValue::from_str(&value).expect("cookie header value"),
        )
    }

    /// `Authorization: Bearer <token>` header.
    pub fn bearer_header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let value = format!("Bearer {}", self.access_token(secret));
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&value).expect("authorization header value"),
        )
    }

    /// `Cookie: userId=<identity token>` header.
    pub fn identity_cookie_header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let value = format!("{USER_ID}={}", self.identity_token(secret));
        (
            header::COOKIE,
            HeaderValue::from_str(&value).expect("cookie header value"),
        )
    }
}
