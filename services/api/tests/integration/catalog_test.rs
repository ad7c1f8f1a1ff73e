use axum::http::{HeaderValue, StatusCode, header};
use serde_json::{Value, json};

use shopfront_api::domain::repository::CategoryRepository;
use shopfront_api::error::ApiError;
use shopfront_api::infra::memory::MemoryStore;
use shopfront_api::usecase::catalog::{
    CreateSubCategoryInput, CreateSubCategoryUseCase, ListCategoriesUseCase,
};
use shopfront_domain::id::CategoryId;
use shopfront_testing::auth::{TEST_ACCESS_SECRET, TestAuth};

use crate::helpers::{TestApp, admin_cookie, seed_catalog, user_cookie};

// ── Access control ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_on_admin_routes() {
    let app = TestApp::new();

    let res = app.server.get("/api/admin/categories").await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn should_forbid_plain_users_on_admin_routes() {
    let app = TestApp::new();
    let (name, value) = user_cookie();

    let res = app
        .server
        .get("/api/admin/categories")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_allow_admins_on_admin_routes() {
    let app = TestApp::new();
    let (name, value) = admin_cookie();

    let res = app
        .server
        .get("/api/admin/categories")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn should_accept_bearer_header() {
    let app = TestApp::new();
    let (name, value) = TestAuth::admin().bearer_header(TEST_ACCESS_SECRET);

    let res = app
        .server
        .get("/api/admin/categories")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_reject_expired_access_token() {
    let app = TestApp::new();
    let token = TestAuth::admin().access_token_expiring(TEST_ACCESS_SECRET, 1_000);

    let res = app
        .server
        .get("/api/admin/categories")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_let_admins_and_users_browse_user_routes() {
    let app = TestApp::new();

    for (name, value) in [user_cookie(), admin_cookie()] {
        let res = app
            .server
            .get("/api/user/categories")
            .add_header(name, value)
            .await;
        assert_eq!(res.status_code(), StatusCode::OK);
    }
}

#[tokio::test]
async fn should_serve_index_documents_publicly() {
    let app = TestApp::new();

    for path in ["/api/auth", "/api/admin", "/api/user"] {
        let res = app.server.get(path).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        let body: Value = res.json();
        assert_eq!(body["version"], "1.0.0");
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_category_once() {
    let app = TestApp::new();
    let (name, value) = admin_cookie();

    let created = app
        .server
        .post("/api/admin/categories")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "Phones" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["message"], "Category added successfully");
    assert_eq!(body["data"]["name"], "Phones");

    let duplicate = app
        .server
        .post("/api/admin/categories")
        .add_header(name, value)
        .json(&json!({ "name": "Phones" }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
    let body: Value = duplicate.json();
    assert_eq!(body["message"], "Category already exists");
}

#[tokio::test]
async fn should_require_category_name() {
    let app = TestApp::new();
    let (name, value) = admin_cookie();

    let res = app
        .server
        .post("/api/admin/categories")
        .add_header(name, value)
        .json(&json!({ "name": "   " }))
        .await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["message"], "Category name is required");
}

#[tokio::test]
async fn should_list_categories_by_name() {
    let store = MemoryStore::new();
    for name in ["Tablets", "Audio", "Phones"] {
        CategoryRepository::create(&store, name).await.unwrap();
    }

    let names: Vec<String> = ListCategoriesUseCase { categories: store }
        .execute()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, ["Audio", "Phones", "Tablets"]);
}

// ── Subcategories ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_subcategory_with_populated_category() {
    let app = TestApp::new();
    let (category, _) = seed_catalog(&app.store).await;
    let (name, value) = admin_cookie();

    let res = app
        .server
        .post("/api/admin/subcategories")
        .add_header(name, value)
        .json(&json!({ "name": "iOS", "categoryId": category.id.to_string() }))
        .await;

    assert_eq!(res.status_code(), StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["message"], "Subcategory added successfully");
    assert_eq!(body["data"]["name"], "iOS");
    assert_eq!(body["data"]["category"]["name"], "Phones");
}

#[tokio::test]
async fn should_reject_duplicate_subcategory_in_same_category() {
    let app = TestApp::new();
    let (category, sub) = seed_catalog(&app.store).await;
    let (name, value) = admin_cookie();

    let res = app
        .server
        .post("/api/admin/subcategories")
        .add_header(name, value)
        .json(&json!({ "name": sub.name, "categoryId": category.id.to_string() }))
        .await;

    assert_eq!(res.status_code(), StatusCode::CONFLICT);
    let body: Value = res.json();
    assert_eq!(body["message"], "Subcategory already exists under this category");
}

#[tokio::test]
async fn should_validate_subcategory_input() {
    let app = TestApp::new();
    let (name, value) = admin_cookie();

    let cases = [
        (
            json!({ "name": "iOS" }),
            "Subcategory name and category ID are required",
        ),
        (
            json!({ "name": "iOS", "categoryId": "not-a-uuid" }),
            "Selected category does not exist",
        ),
        (
            json!({ "name": "iOS", "categoryId": CategoryId::new().to_string() }),
            "Selected category does not exist",
        ),
    ];

    for (payload, message) in cases {
        let res = app
            .server
            .post("/api/admin/subcategories")
            .add_header(name.clone(), value.clone())
            .json(&payload)
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = res.json();
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn should_list_subcategories_with_category() {
    let app = TestApp::new();
    seed_catalog(&app.store).await;
    let (name, value) = user_cookie();

    let res = app
        .server
        .get("/api/user/subcategories")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["message"], "Subcategories retrieved successfully");
    assert_eq!(body["data"][0]["name"], "Android");
    assert_eq!(body["data"][0]["category"]["name"], "Phones");
}

#[tokio::test]
async fn should_allow_same_subcategory_name_under_different_categories() {
    let store = MemoryStore::new();
    let (_, sub) = seed_catalog(&store).await;
    let tablets = CategoryRepository::create(&store, "Tablets").await.unwrap();
    let usecase = CreateSubCategoryUseCase {
        subcategories: store.clone(),
        categories: store.clone(),
    };

    let created = usecase
        .execute(CreateSubCategoryInput {
            name: sub.name.clone(),
            category_id: tablets.id.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.category.unwrap().id, tablets.id);

    let err = usecase
        .execute(CreateSubCategoryInput {
            name: sub.name,
            category_id: tablets.id.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::SubCategoryExists));
}
