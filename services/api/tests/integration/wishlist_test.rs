use axum::http::StatusCode;
use serde_json::{Value, json};

use shopfront_api::domain::repository::ProductRepository;
use shopfront_api::domain::types::ProductDraft;
use shopfront_api::infra::memory::MemoryStore;
use shopfront_api::usecase::wishlist::WishlistUseCase;
use shopfront_domain::id::{ProductId, SubCategoryId, UserId};
use shopfront_domain::user::Role;

use crate::helpers::{TestApp, cookie_for, seed_catalog, seed_product, variant};

async fn add(app: &TestApp, user: UserId, product_id: Value) -> axum_test::TestResponse {
    let (name, value) = cookie_for(user, Role::User);
    app.server
        .post("/api/user/wishlist")
        .add_header(name, value)
        .json(&json!({ "productId": product_id }))
        .await
}

fn usecase(store: &MemoryStore) -> WishlistUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    WishlistUseCase {
        wishlists: store.clone(),
        products: store.clone(),
        subcategories: store.clone(),
        categories: store.clone(),
    }
}

// ── Add ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_add_product_once() {
    let app = TestApp::new();
    let (_, sub) = seed_catalog(&app.store).await;
    let product = seed_product(&app.store, sub.id, "Pixel", &[]).await;
    let user = UserId::new();

    let first = add(&app, user, json!(product.id.to_string())).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body: Value = first.json();
    assert_eq!(body["message"], "Product added to wishlist");
    assert_eq!(body["data"]["user"], user.to_string());
    assert_eq!(body["data"]["items"][0]["product"]["title"], "Pixel");
    assert_eq!(
        body["data"]["items"][0]["product"]["subcategory"]["category"]["name"],
        "Phones"
    );

    let second = add(&app, user, json!(product.id.to_string())).await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
    let body: Value = second.json();
    assert_eq!(body["message"], "Product already in wishlist");
}

#[tokio::test]
async fn should_validate_product_to_add() {
    let app = TestApp::new();
    let user = UserId::new();

    let missing = add(&app, user, Value::Null).await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["message"], "Product ID is required");

    let malformed = add(&app, user, json!("nope")).await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    let unknown = add(&app, user, json!(ProductId::new().to_string())).await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unknown.json::<Value>()["message"], "Product not found");
}

#[tokio::test]
async fn should_keep_wishlist_in_insertion_order() {
    let store = MemoryStore::new();
    let (_, sub) = seed_catalog(&store).await;
    let a = seed_product(&store, sub.id, "A", &[]).await;
    let b = seed_product(&store, sub.id, "B", &[]).await;
    let user = UserId::new();
    let usecase = usecase(&store);

    usecase.add(user, Some(&b.id.to_string())).await.unwrap();
    let wishlist = usecase.add(user, Some(&a.id.to_string())).await.unwrap();

    let titles: Vec<&str> = wishlist
        .items
        .iter()
        .map(|p| p.product.title.as_str())
        .collect();
    assert_eq!(titles, ["B", "A"]);
}

// ── Get ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_empty_placeholder_without_wishlist() {
    let app = TestApp::new();
    let user = UserId::new();
    let (name, value) = cookie_for(user, Role::User);

    let res = app
        .server
        .get("/api/user/wishlist")
        .add_header(name, value)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"], json!({ "user": user.to_string(), "items": [] }));
}

#[tokio::test]
async fn should_scope_wishlists_per_user() {
    let app = TestApp::new();
    let (_, sub) = seed_catalog(&app.store).await;
    let product = seed_product(&app.store, sub.id, "Pixel", &[]).await;
    let alice = UserId::new();
    let bob = UserId::new();
    add(&app, alice, json!(product.id.to_string())).await;

    let (name, value) = cookie_for(bob, Role::User);
    let res = app
        .server
        .get("/api/user/wishlist")
        .add_header(name, value)
        .await;

    let body: Value = res.json();
    assert_eq!(body["data"]["items"], json!([]));

    // Bob can still add the same product to his own list.
    let res = add(&app, bob, json!(product.id.to_string())).await;
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_let_admins_keep_a_wishlist() {
    let app = TestApp::new();
    let (_, sub) = seed_catalog(&app.store).await;
    let product = seed_product(&app.store, sub.id, "Pixel", &[]).await;
    let (name, value) = cookie_for(UserId::new(), Role::Admin);

    let res = app
        .server
        .post("/api/user/wishlist")
        .add_header(name, value)
        .json(&json!({ "productId": product.id.to_string() }))
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_keep_items_whose_subcategory_disappeared() {
    let store = MemoryStore::new();
    let (_, sub) = seed_catalog(&store).await;
    let product = seed_product(&store, sub.id, "Pixel", &[]).await;
    let user = UserId::new();
    let usecase = usecase(&store);
    usecase.add(user, Some(&product.id.to_string())).await.unwrap();

    // Point the product at a subcategory that no longer exists.
    let orphan = store
        .update(
            product.id,
            ProductDraft {
                title: "Pixel".into(),
                description: "A phone".into(),
                variants: vec![variant()],
                subcategory_id: SubCategoryId::new(),
                images: Vec::new(),
            },
        )
        .await
        .unwrap()
        .unwrap();

    let wishlist = usecase.get(user).await.unwrap().unwrap();
    assert_eq!(wishlist.items.len(), 1);
    assert_eq!(wishlist.items[0].product.id, orphan.id);
    assert!(wishlist.items[0].subcategory.is_none());
}

// ── Remove / clear ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_product_from_wishlist() {
    let app = TestApp::new();
    let (_, sub) = seed_catalog(&app.store).await;
    let product = seed_product(&app.store, sub.id, "Pixel", &[]).await;
    let user = UserId::new();
    add(&app, user, json!(product.id.to_string())).await;
    let (name, value) = cookie_for(user, Role::User);

    let removed = app
        .server
        .delete(&format!("/api/user/wishlist/{}", product.id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(removed.status_code(), StatusCode::OK);
    let body: Value = removed.json();
    assert_eq!(body["message"], "Product removed from wishlist");
    assert_eq!(body["data"]["items"], json!([]));

    let again = app
        .server
        .delete(&format!("/api/user/wishlist/{}", product.id))
        .add_header(name, value)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        again.json::<Value>()["message"],
        "Product not found in wishlist"
    );
}

#[tokio::test]
async fn should_report_missing_wishlist_on_remove_and_clear() {
    let app = TestApp::new();
    let (name, value) = cookie_for(UserId::new(), Role::User);

    let removed = app
        .server
        .delete(&format!("/api/user/wishlist/{}", ProductId::new()))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(removed.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(removed.json::<Value>()["message"], "Wishlist not found");

    let cleared = app
        .server
        .delete("/api/user/wishlist")
        .add_header(name, value)
        .await;
    assert_eq!(cleared.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_clear_wishlist() {
    let app = TestApp::new();
    let (_, sub) = seed_catalog(&app.store).await;
    let user = UserId::new();
    for title in ["A", "B"] {
        let product = seed_product(&app.store, sub.id, title, &[]).await;
        add(&app, user, json!(product.id.to_string())).await;
    }
    let (name, value) = cookie_for(user, Role::User);

    let res = app
        .server
        .delete("/api/user/wishlist")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["message"], "Wishlist cleared successfully");
    assert_eq!(body["data"]["items"], json!([]));
    assert!(body["data"]["id"].is_string());

    let res = app
        .server
        .get("/api/user/wishlist")
        .add_header(name, value)
        .await;
    let body: Value = res.json();
    assert_eq!(body["data"]["items"], json!([]));
    assert!(body["data"]["id"].is_string());
}
