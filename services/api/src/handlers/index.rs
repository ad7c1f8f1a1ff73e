//! Self-describing index documents for each route group.

use axum::Json;
use serde_json::{Value, json};

const API_VERSION: &str = "1.0.0";

pub async fn auth_index() -> Json<Value> {
    Json(json!({
        "message": "API is running!",
        "version": API_VERSION,
        "endpoints": {
            "auth": {
                "POST /api/auth/signup": "signup to server",
                "POST /api/auth/signin": "login to server",
                "POST /api/auth/refresh": "refresh the access token",
                "POST /api/auth/logout": "logout from server",
            },
        },
    }))
}

pub async fn admin_index() -> Json<Value> {
    Json(json!({
        "message": "Admin API is running!",
        "version": API_VERSION,
        "endpoints": {
            "categories": {
                "POST /api/admin/categories": "Add a new category",
                "GET /api/admin/categories": "Get all categories",
            },
            "subcategories": {
                "POST /api/admin/subcategories": "Add a new subcategory",
                "GET /api/admin/subcategories": "Get all subcategories",
            },
            "products": {
                "POST /api/admin/products": "Add a new product",
                "GET /api/admin/products": "Get all products",
                "GET /api/admin/product/{id}": "Get one product",
                "PUT /api/admin/product/{id}": "Edit a product",
            },
        },
    }))
}

pub async fn user_index() -> Json<Value> {
    Json(json!({
        "message": "API is running!",
        "version": API_VERSION,
        "endpoints": {
            "catalog": {
                "GET /api/user/categories": "Get all categories",
                "GET /api/user/subcategories": "Get all subcategories",
                "GET /api/user/products": "Browse products",
                "GET /api/user/product/{id}": "Get one product",
            },
            "wishlist": {
                "GET /api/user/wishlist": "Get your wishlist",
                "POST /api/user/wishlist": "Add a product to your wishlist",
                "DELETE /api/user/wishlist/{productId}": "Remove a product",
                "DELETE /api/user/wishlist": "Clear your wishlist",
            },
        },
    }))
}
