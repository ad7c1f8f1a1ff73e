use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use shopfront_core::envelope::Envelope;
use shopfront_core::extract::Json;

use crate::domain::repository::Repositories;
use crate::error::ApiError;
use crate::handlers::view::{CategoryView, SubCategoryView};
use crate::state::AppState;
use crate::usecase::catalog::{
    CreateCategoryUseCase, CreateSubCategoryInput, CreateSubCategoryUseCase,
    ListCategoriesUseCase, ListSubCategoriesUseCase,
};

// ── GET categories ───────────────────────────────────────────────────────────

pub async fn list_categories<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Envelope<Vec<CategoryView>>, ApiError> {
    let usecase = ListCategoriesUseCase {
        categories: state.category_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(Envelope::ok(
        categories.into_iter().map(CategoryView::from).collect(),
        "Categories retrieved successfully",
    ))
}

// ── POST /api/admin/categories ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn create_category<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateCategoryUseCase {
        categories: state.category_repo(),
    };
    let category = usecase
        .execute(body.name.as_deref().unwrap_or_default())
        .await?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok(CategoryView::from(category), "Category added successfully"),
    ))
}

// ── GET subcategories ────────────────────────────────────────────────────────

pub async fn list_subcategories<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Envelope<Vec<SubCategoryView>>, ApiError> {
    let usecase = ListSubCategoriesUseCase {
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
    };
    let subcategories = usecase.execute().await?;
    Ok(Envelope::ok(
        subcategories.into_iter().map(SubCategoryView::from).collect(),
        "Subcategories retrieved successfully",
    ))
}

// ── POST /api/admin/subcategories ────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

pub async fn create_subcategory<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateSubCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateSubCategoryUseCase {
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
    };
    let subcategory = usecase
        .execute(CreateSubCategoryInput {
            name: body.name.unwrap_or_default(),
            category_id: body.category_id.unwrap_or_default(),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok(
            SubCategoryView::from(subcategory),
            "Subcategory added successfully",
        ),
    ))
}
