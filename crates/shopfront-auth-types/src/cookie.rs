//! Cookie builders for the access and identity tokens.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::IDENTITY_TOKEN_EXP;

/// Cookie name for the access token.
pub const ACCESS_TOKEN: &str = "accessToken";

/// Cookie name for the identity token read by the refresh flow.
pub const USER_ID: &str = "userId";

/// Cookie name for the refresh token. Never set by the server, only cleared.
pub const REFRESH_TOKEN: &str = "refreshToken";

/// `accessToken` cookie lifetime in seconds (3 minutes). Shorter than the JWT.
pub const ACCESS_COOKIE_MAX_AGE: i64 = 3 * 60;

/// Attributes shared by every auth cookie.
///
/// `secure` is on in production; `domain` is omitted when `None`.
#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    pub secure: bool,
    pub domain: Option<String>,
}

impl CookiePolicy {
    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        let mut builder = Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }
}

/// Set the access-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use shopfront_auth_types::cookie::{set_access_token_cookie, CookiePolicy, ACCESS_TOKEN};
///
/// let policy = CookiePolicy { secure: true, domain: Some("example.com".to_string()) };
/// let jar = set_access_token_cookie(CookieJar::new(), "token_value".to_string(), &policy);
/// let cookie = jar.get(ACCESS_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(180)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Strict));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(jar: CookieJar, value: String, policy: &CookiePolicy) -> CookieJar {
    jar.add(policy.build(
        ACCESS_TOKEN,
        value,
        Duration::seconds(ACCESS_COOKIE_MAX_AGE),
    ))
}

/// Set the identity-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use shopfront_auth_types::cookie::{set_user_id_cookie, CookiePolicy, USER_ID};
///
/// let jar = set_user_id_cookie(CookieJar::new(), "id_value".to_string(), &CookiePolicy::default());
/// let cookie = jar.get(USER_ID).unwrap();
/// assert_eq!(cookie.value(), "id_value");
/// assert_eq!(cookie.domain(), None);
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(!cookie.secure().unwrap_or(false));
/// ```
pub fn set_user_id_cookie(jar: CookieJar, value: String, policy: &CookiePolicy) -> CookieJar {
    jar.add(policy.build(
        USER_ID,
        value,
        Duration::seconds(IDENTITY_TOKEN_EXP as i64),
    ))
}

/// Clear every auth cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use shopfront_auth_types::cookie::{
///     clear_cookies, set_access_token_cookie, CookiePolicy, ACCESS_TOKEN, REFRESH_TOKEN, USER_ID,
/// };
///
/// let policy = CookiePolicy::default();
/// let jar = set_access_token_cookie(CookieJar::new(), "a".to_string(), &policy);
/// let jar = clear_cookies(jar, &policy);
/// for name in [ACCESS_TOKEN, USER_ID, REFRESH_TOKEN] {
///     let cookie = jar.get(name).unwrap();
///     assert_eq!(cookie.value(), "");
///     assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// }
/// ```
pub fn clear_cookies(jar: CookieJar, policy: &CookiePolicy) -> CookieJar {
    jar.add(policy.build(ACCESS_TOKEN, String::new(), Duration::ZERO))
        .add(policy.build(USER_ID, String::new(), Duration::ZERO))
        .add(policy.build(REFRESH_TOKEN, String::new(), Duration::ZERO))
}
