use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use serde_json::{Value, json};

use shopfront_api::domain::repository::UserRepository;
use shopfront_api::error::ApiError;
use shopfront_api::infra::memory::MemoryStore;
use shopfront_api::usecase::auth::{LoginInput, LoginUseCase, SignupInput, SignupUseCase};
use shopfront_auth_types::cookie::ACCESS_COOKIE_MAX_AGE;
use shopfront_auth_types::token::{IDENTITY_TOKEN_EXP, validate_access_token};
use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;
use shopfront_testing::auth::{TEST_ACCESS_SECRET, TEST_USERID_SECRET, TestAuth};

use crate::helpers::{TestApp, fast_hasher, seed_user, token_service};

fn identity_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("userId={token}")).unwrap(),
    )
}

async fn sign_up(app: &TestApp, name: &str, email: &str) -> axum_test::TestResponse {
    app.server
        .post("/api/auth/signup")
        .json(&json!({ "name": name, "email": email, "password": "hunter22" }))
        .await
}

fn refresh_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("refreshToken={token}")).unwrap(),
    )
}

async fn stored_refresh_token(app: &TestApp, email: &str) -> Option<String> {
    app.store
        .find_by_email(email)
        .await
        .unwrap()
        .unwrap()
        .refresh_token
}

// ── Signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_up_as_plain_user_without_leaking_password() {
    let app = TestApp::new();

    let res = sign_up(&app, "jane", "jane@example.com").await;

    assert_eq!(res.status_code(), StatusCode::CREATED);
    let text = res.text();
    assert!(!text.contains("hunter22"));
    assert!(!text.contains("$2"), "bcrypt hash leaked: {text}");
    assert!(!text.contains("refreshToken"));

    let body: Value = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert_eq!(body["data"]["user"]["email"], "jane@example.com");

    let access = res.cookie("accessToken");
    assert_eq!(access.http_only(), Some(true));
    assert_eq!(body["data"]["accessToken"], access.value());
    assert!(!res.cookie("userId").value().is_empty());

    let claims = validate_access_token(access.value(), TEST_ACCESS_SECRET).unwrap();
    assert_eq!(claims.role, Role::User);
}

#[tokio::test]
async fn should_store_refresh_token_on_signup() {
    let app = TestApp::new();
    sign_up(&app, "jane", "jane@example.com").await;

    let user = app
        .store
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.refresh_token.is_some());
    assert_ne!(user.password_hash, "hunter22");
}

#[tokio::test]
async fn should_reject_duplicate_email_or_name() {
    let app = TestApp::new();
    sign_up(&app, "jane", "jane@example.com").await;

    for (name, email) in [("other", "jane@example.com"), ("jane", "other@example.com")] {
        let res = sign_up(&app, name, email).await;
        assert_eq!(res.status_code(), StatusCode::CONFLICT);
        let body: Value = res.json();
        assert_eq!(
            body["message"],
            "User with this email or username already exists"
        );
    }
}

#[tokio::test]
async fn should_validate_signup_fields() {
    let app = TestApp::new();

    let cases = [
        (
            json!({ "email": "jane@example.com", "password": "hunter22" }),
            "Name, email, and password are required",
        ),
        (
            json!({ "name": "jane", "email": "not-an-email", "password": "hunter22" }),
            "Please provide a valid email address",
        ),
        (
            json!({ "name": "jane", "email": "jane@example.com", "password": "12345" }),
            "Password must be at least 6 characters long",
        ),
    ];

    for (payload, message) in cases {
        let res = app.server.post("/api/auth/signup").json(&payload).await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = res.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let app = TestApp::new();

    let res = app
        .server
        .post("/api/auth/signup")
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes("{not json".into())
        .await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["success"], false);
}

// ── Signin ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_in_with_valid_credentials() {
    let app = TestApp::new();
    seed_user(&app.store, "jane", "jane@example.com", "hunter22").await;

    let res = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "hunter22" }))
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["name"], "jane");
    assert!(body["data"]["user"].get("password").is_none());
    let access = res.cookie("accessToken");
    assert_eq!(
        access.max_age().map(|d| d.whole_seconds()),
        Some(ACCESS_COOKIE_MAX_AGE)
    );
    assert_eq!(
        res.cookie("userId").max_age().map(|d| d.whole_seconds()),
        Some(IDENTITY_TOKEN_EXP as i64)
    );
}

#[tokio::test]
async fn should_answer_unknown_email_and_wrong_password_identically() {
    let app = TestApp::new();
    seed_user(&app.store, "jane", "jane@example.com", "hunter22").await;

    let wrong_password = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "nope-nope" }))
        .await;
    let unknown_email = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "ghost@example.com", "password": "hunter22" }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>(), unknown_email.json::<Value>());
}

#[tokio::test]
async fn should_require_credentials() {
    let app = TestApp::new();

    let res = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "jane@example.com" }))
        .await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["message"], "Email and password are required");
}

// ── Refresh ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_access_token_from_identity_cookie() {
    let app = TestApp::new();
    let signup = sign_up(&app, "jane", "jane@example.com").await;
    let identity = signup.cookie("userId").value().to_owned();

    let (name, value) = identity_cookie(&identity);
    let res = app
        .server
        .post("/api/auth/refresh")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["message"], "Token refreshed successfully");
    let token = body["data"]["accessToken"].as_str().unwrap();
    assert_eq!(res.cookie("accessToken").value(), token);

    let claims = validate_access_token(token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(claims.email, "jane@example.com");
    assert_eq!(claims.role, Role::User);
}

#[tokio::test]
async fn should_rotate_stored_refresh_token_on_refresh_and_signin() {
    let app = TestApp::new();
    let signup = sign_up(&app, "jane", "jane@example.com").await;
    let identity = signup.cookie("userId").value().to_owned();
    let initial = stored_refresh_token(&app, "jane@example.com").await.unwrap();

    let (name, value) = identity_cookie(&identity);
    let res = app
        .server
        .post("/api/auth/refresh")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let refreshed = stored_refresh_token(&app, "jane@example.com").await.unwrap();
    assert_ne!(refreshed, initial);

    let res = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "hunter22" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let signed_in = stored_refresh_token(&app, "jane@example.com").await.unwrap();
    assert_ne!(signed_in, refreshed);
    assert_ne!(signed_in, initial);
}

#[tokio::test]
async fn should_reject_refresh_without_identity_cookie() {
    let app = TestApp::new();

    let res = app.server.post("/api/auth/refresh").await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["message"], "UserId not provided");
}

#[tokio::test]
async fn should_reject_tampered_identity_cookie() {
    let app = TestApp::new();
    let signup = sign_up(&app, "jane", "jane@example.com").await;
    let mut identity = signup.cookie("userId").value().to_owned();
    identity.push('x');

    let (name, value) = identity_cookie(&identity);
    let res = app
        .server
        .post("/api/auth/refresh")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["message"], "Invalid refresh token");
}

#[tokio::test]
async fn should_reject_identity_of_unknown_user() {
    let app = TestApp::new();
    let (name, value) =
        TestAuth::new(UserId::new(), "ghost@example.com", Role::User)
            .identity_cookie_header(TEST_USERID_SECRET);

    let res = app
        .server
        .post("/api/auth/refresh")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["message"], "Invalid userId token");
}

// ── Logout ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_clear_cookies_and_stored_refresh_token_on_logout() {
    let app = TestApp::new();
    let signup = sign_up(&app, "jane", "jane@example.com").await;
    let identity = signup.cookie("userId").value().to_owned();

    let (name, value) = identity_cookie(&identity);
    let res = app
        .server
        .post("/api/auth/logout")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["message"], "Logout successful");
    assert!(res.cookie("accessToken").value().is_empty());
    assert!(res.cookie("userId").value().is_empty());

    let user = app
        .store
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.refresh_token.is_none());
}

#[tokio::test]
async fn should_forget_only_the_matching_refresh_token_on_logout() {
    let app = TestApp::new();
    sign_up(&app, "jane", "jane@example.com").await;
    sign_up(&app, "john", "john@example.com").await;
    let jane_token = stored_refresh_token(&app, "jane@example.com").await.unwrap();
    let john_token = stored_refresh_token(&app, "john@example.com").await.unwrap();

    let (name, value) = refresh_cookie("not-a-stored-token");
    let res = app
        .server
        .post("/api/auth/logout")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(
        stored_refresh_token(&app, "jane@example.com").await,
        Some(jane_token.clone())
    );
    assert_eq!(
        stored_refresh_token(&app, "john@example.com").await,
        Some(john_token.clone())
    );

    let (name, value) = refresh_cookie(&jane_token);
    let res = app
        .server
        .post("/api/auth/logout")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(res.cookie("refreshToken").value().is_empty());
    assert_eq!(stored_refresh_token(&app, "jane@example.com").await, None);
    assert_eq!(
        stored_refresh_token(&app, "john@example.com").await,
        Some(john_token)
    );
}

#[tokio::test]
async fn should_log_out_without_any_cookies() {
    let app = TestApp::new();

    let res = app.server.post("/api/auth/logout").await;

    assert_eq!(res.status_code(), StatusCode::OK);
}

// ── Use cases ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_normalize_signup_input() {
    let store = MemoryStore::new();
    let usecase = SignupUseCase {
        users: store.clone(),
        passwords: fast_hasher(),
        tokens: token_service(),
    };

    let session = usecase
        .execute(SignupInput {
            name: "  jane ".into(),
            email: " jane@example.com ".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.user.name, "jane");
    assert_eq!(session.user.email, "jane@example.com");
    assert_eq!(session.user.role, Role::User);
}

#[tokio::test]
async fn should_fail_login_for_unknown_email() {
    let usecase = LoginUseCase {
        users: MemoryStore::new(),
        passwords: fast_hasher(),
        tokens: token_service(),
    };

    let err = usecase
        .execute(LoginInput {
            email: "ghost@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidCredentials));
}
