use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use shopfront_core::envelope::Envelope;
use shopfront_core::extract::{Path, Query};
use shopfront_domain::catalog::MAX_PRODUCT_IMAGES;

use crate::domain::repository::Repositories;
use crate::domain::types::{ImageUpload, MAX_IMAGE_BYTES};
use crate::error::ApiError;
use crate::handlers::view::ProductView;
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductUseCase, GetProductUseCase, ListProductsInput, ListProductsUseCase, ProductForm,
    UpdateProductUseCase,
};

// ── Multipart form ───────────────────────────────────────────────────────────

fn invalid_multipart(err: MultipartError) -> ApiError {
    ApiError::InvalidMultipart(err.body_text())
}

/// Buffer one `images` part, enforcing the type and size limits as it streams.
async fn read_image(mut field: Field<'_>) -> Result<Option<ImageUpload>, ApiError> {
    let file_name = field.file_name().map(str::to_owned);
    // Browsers send an empty, nameless part when no file was picked.
    if file_name.as_deref() == Some("") {
        return Ok(None);
    }
    let content_type = field.content_type().unwrap_or_default().to_owned();
    if !content_type.starts_with("image/") {
        return Err(ApiError::UnsupportedImageType);
    }

    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(invalid_multipart)? {
        if buf.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::ImageTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes: Bytes::from(buf),
    }))
}

async fn read_product_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ProductForm, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::InvalidMultipart(e.body_text()))?;
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "images" => {
                if let Some(image) = read_image(field).await? {
                    if form.images.len() == MAX_PRODUCT_IMAGES {
                        return Err(ApiError::TooManyImages);
                    }
                    form.images.push(image);
                }
            }
            "title" => form.title = Some(field.text().await.map_err(invalid_multipart)?),
            "description" => {
                form.description = Some(field.text().await.map_err(invalid_multipart)?)
            }
            "subcategory" => {
                form.subcategory = Some(field.text().await.map_err(invalid_multipart)?)
            }
            "variants" => form.variants = Some(field.text().await.map_err(invalid_multipart)?),
            "existingImages" => {
                form.existing_images = Some(field.text().await.map_err(invalid_multipart)?)
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(form)
}

// ── GET products ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub subcategory: Option<String>,
}

pub async fn list_products<R: Repositories>(
    State(state): State<AppState<R>>,
    Query(params): Query<ProductListParams>,
) -> Result<Envelope<Vec<ProductView>>, ApiError> {
    let usecase = ListProductsUseCase {
        products: state.product_repo(),
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
    };
    let page = usecase
        .execute(ListProductsInput {
            page: params.page,
            limit: params.limit,
            search: params.search,
            subcategory: params.subcategory,
        })
        .await?;
    Ok(Envelope::ok(
        page.items.into_iter().map(ProductView::from).collect(),
        "Products retrieved successfully",
    )
    .with_pagination(page.page))
}

// ── GET product/{id} ─────────────────────────────────────────────────────────

pub async fn get_product<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Envelope<ProductView>, ApiError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
    };
    let product = usecase.execute(&id).await?;
    Ok(Envelope::ok(
        product.into(),
        "Product retrieved successfully",
    ))
}

// ── POST /api/admin/products ─────────────────────────────────────────────────

pub async fn create_product<R: Repositories>(
    State(state): State<AppState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_product_form(multipart).await?;
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
        images: state.image_store(),
    };
    let product = usecase.execute(form).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok(ProductView::from(product), "Product added successfully"),
    ))
}

// ── PUT /api/admin/product/{id} ──────────────────────────────────────────────

pub async fn update_product<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Envelope<ProductView>, ApiError> {
    let form = read_product_form(multipart).await?;
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
        subcategories: state.subcategory_repo(),
        categories: state.category_repo(),
        images: state.image_store(),
    };
    let product = usecase.execute(&id, form).await?;
    Ok(Envelope::ok(product.into(), "Product updated successfully"))
}
