use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::multipart::MultipartForm;
use serde_json::{Value, json};

use shopfront_api::domain::repository::UserRepository;
use shopfront_api::domain::types::NewUser;
use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;

use crate::helpers::{TestApp, VARIANTS_JSON, fast_hasher};

fn access_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("accessToken={token}")).unwrap(),
    )
}

/// Seed an admin account directly, then sign in over HTTP like the dashboard does.
async fn admin_session(app: &TestApp) -> (HeaderName, HeaderValue) {
    let password_hash = fast_hasher().hash("admin-pass").await.unwrap();
    app.store
        .create(NewUser {
            id: UserId::new(),
            name: "admin".into(),
            email: "admin@example.com".into(),
            password_hash,
            refresh_token: None,
            role: Role::Admin,
        })
        .await
        .unwrap();

    let res = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "admin@example.com", "password": "admin-pass" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    access_cookie(res.cookie("accessToken").value())
}

#[tokio::test]
async fn should_keep_fresh_signups_out_of_admin_routes() {
    let app = TestApp::new();

    let signup = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": "jane", "email": "jane@example.com", "password": "hunter22" }))
        .await;
    assert_eq!(signup.status_code(), StatusCode::CREATED);
    let (name, value) = access_cookie(signup.cookie("accessToken").value());

    let res = app
        .server
        .post("/api/admin/categories")
        .add_header(name, value)
        .json(&json!({ "name": "Phones" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = admin_session(&app).await;
    let created = app
        .server
        .post("/api/admin/categories")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "Phones" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let duplicate = app
        .server
        .post("/api/admin/categories")
        .add_header(name, value)
        .json(&json!({ "name": "Phones" }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_build_and_browse_a_catalog() {
    let app = TestApp::new();
    let (admin_name, admin_value) = admin_session(&app).await;

    let category: Value = app
        .server
        .post("/api/admin/categories")
        .add_header(admin_name.clone(), admin_value.clone())
        .json(&json!({ "name": "Phones" }))
        .await
        .json();
    let category_id = category["data"]["id"].as_str().unwrap().to_owned();

    let sub: Value = app
        .server
        .post("/api/admin/subcategories")
        .add_header(admin_name.clone(), admin_value.clone())
        .json(&json!({ "name": "Android", "categoryId": category_id }))
        .await
        .json();
    let sub_id = sub["data"]["id"].as_str().unwrap().to_owned();

    for i in 0..25 {
        let res = app
            .server
            .post("/api/admin/products")
            .add_header(admin_name.clone(), admin_value.clone())
            .multipart(
                MultipartForm::new()
                    .add_text("title", format!("Phone {i:02}"))
                    .add_text("description", "A phone")
                    .add_text("subcategory", sub_id.clone())
                    .add_text("variants", VARIANTS_JSON),
            )
            .await;
        assert_eq!(res.status_code(), StatusCode::CREATED);
    }

    // A shopper signs up, browses page 2 and saves a product.
    let signup = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": "jane", "email": "jane@example.com", "password": "hunter22" }))
        .await;
    let (name, value) = access_cookie(signup.cookie("accessToken").value());

    let page: Value = app
        .server
        .get("/api/user/products?page=2&limit=10")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["pagination"]["totalPages"], 3);
    assert_eq!(page["pagination"]["hasNextPage"], true);
    assert_eq!(page["pagination"]["hasPrevPage"], true);

    let product_id = page["data"][0]["id"].as_str().unwrap().to_owned();
    let saved = app
        .server
        .post("/api/user/wishlist")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "productId": product_id }))
        .await;
    assert_eq!(saved.status_code(), StatusCode::OK);

    let again = app
        .server
        .post("/api/user/wishlist")
        .add_header(name, value)
        .json(&json!({ "productId": product_id }))
        .await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_survive_a_full_session_cycle() {
    let app = TestApp::new();

    let signup = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": "jane", "email": "jane@example.com", "password": "hunter22" }))
        .await;
    let identity = signup.cookie("userId").value().to_owned();
    let identity_header = HeaderValue::from_str(&format!("userId={identity}")).unwrap();

    let refreshed = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::COOKIE, identity_header.clone())
        .await;
    assert_eq!(refreshed.status_code(), StatusCode::OK);
    let (name, value) = access_cookie(refreshed.cookie("accessToken").value());

    let res = app
        .server
        .get("/api/user/wishlist")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let logout = app
        .server
        .post("/api/auth/logout")
        .add_header(header::COOKIE, identity_header)
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);

    let signin = app
        .server
        .post("/api/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "hunter22" }))
        .await;
    assert_eq!(signin.status_code(), StatusCode::OK);
}
