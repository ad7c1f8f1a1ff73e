use serde_json::Value;

use shopfront_domain::catalog::Variant;
use shopfront_domain::id::{ProductId, SubCategoryId};
use shopfront_domain::pagination::{PageInfo, PageRequest};

use crate::domain::repository::{
    CategoryRepository, ImageStore, ProductRepository, SubCategoryRepository,
};
use crate::domain::types::{ImageUpload, PopulatedProduct, Product, ProductDraft, ProductQuery};
use crate::error::ApiError;
use crate::usecase::catalog::populate_products;

/// Raw multipart fields for product create/edit. Every text field is taken
/// verbatim from the form; validation happens in the use case.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subcategory: Option<String>,
    pub variants: Option<String>,
    pub existing_images: Option<String>,
    pub images: Vec<ImageUpload>,
}

/// Validated text fields; images are resolved separately.
struct ValidFields {
    title: String,
    description: String,
    subcategory: String,
    variants: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required_fields(form: &mut ProductForm) -> Option<ValidFields> {
    match (
        non_blank(form.title.take()),
        non_blank(form.description.take()),
        non_blank(form.subcategory.take()),
        non_blank(form.variants.take()),
    ) {
        (Some(title), Some(description), Some(subcategory), Some(variants)) => Some(ValidFields {
            title,
            description,
            subcategory,
            variants,
        }),
        _ => None,
    }
}

// ── Variant parsing ──────────────────────────────────────────────────────────

fn positive_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then_some(n)
}

fn positive_count(value: &Value) -> Option<u32> {
    let n = positive_number(value)?;
    (n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn parse_variant(value: &Value) -> Option<Variant> {
    let ram = value.get("ram")?.as_str()?.trim();
    if ram.is_empty() {
        return None;
    }
    Some(Variant {
        ram: ram.to_owned(),
        price: positive_number(value.get("price")?)?,
        quantity: positive_count(value.get("quantity")?)?,
    })
}

/// Parse the `variants` form field: a non-empty JSON array whose entries each
/// carry a non-blank `ram`, a positive `price` and a positive whole `quantity`.
pub fn parse_variants(raw: &str) -> Result<Vec<Variant>, ApiError> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
        return Err(ApiError::InvalidVariantsJson);
    };
    if items.is_empty() {
        return Err(ApiError::NoVariants);
    }
    items
        .iter()
        .map(|v| parse_variant(v).ok_or(ApiError::InvalidVariant))
        .collect()
}

fn parse_existing_images(raw: &str) -> Result<Vec<String>, ApiError> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|_| ApiError::InvalidExistingImages)
}

async fn require_subcategory<S: SubCategoryRepository>(
    subcategories: &S,
    raw: &str,
) -> Result<SubCategoryId, ApiError> {
    let id = raw
        .parse::<SubCategoryId>()
        .map_err(|_| ApiError::SubCategoryNotFound)?;
    subcategories
        .find_by_id(id)
        .await?
        .map(|s| s.id)
        .ok_or(ApiError::SubCategoryNotFound)
}

async fn populate_one<S: SubCategoryRepository, C: CategoryRepository>(
    subcategories: &S,
    categories: &C,
    product: Product,
) -> Result<PopulatedProduct, ApiError> {
    populate_products(subcategories, categories, vec![product])
        .await?
        .pop()
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("populate dropped product")))
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<ProductId>()
        .map_err(|_| ApiError::InvalidProductId)
}

// ── List ─────────────────────────────────────────────────────────────────────

/// Query-string parameters exactly as received.
#[derive(Debug, Default)]
pub struct ListProductsInput {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub subcategory: Option<String>,
}

#[derive(Debug)]
pub struct ProductPage {
    pub items: Vec<PopulatedProduct>,
    pub page: PageInfo,
}

pub struct ListProductsUseCase<P, S, C>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    pub products: P,
    pub subcategories: S,
    pub categories: C,
}

impl<P, S, C> ListProductsUseCase<P, S, C>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    pub async fn execute(&self, input: ListProductsInput) -> Result<ProductPage, ApiError> {
        let page = PageRequest::from_raw(input.page.as_deref(), input.limit.as_deref());
        let subcategory = match non_blank(input.subcategory) {
            Some(raw) => Some(
                raw.parse::<SubCategoryId>()
                    .map_err(|_| ApiError::InvalidSubCategoryId)?,
            ),
            None => None,
        };
        let query = ProductQuery {
            page,
            search: non_blank(input.search),
            subcategory,
        };

        let (products, total) = self.products.list(&query).await?;
        let items = populate_products(&self.subcategories, &self.categories, products).await?;
        Ok(ProductPage {
            items,
            page: PageInfo::new(page, total),
        })
    }
}

// ── Get ──────────────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P, S, C>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    pub products: P,
    pub subcategories: S,
    pub categories: C,
}

impl<P, S, C> GetProductUseCase<P, S, C>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
{
    pub async fn execute(&self, raw_id: &str) -> Result<PopulatedProduct, ApiError> {
        let id = parse_product_id(raw_id)?;
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ProductNotFound)?;
        populate_one(&self.subcategories, &self.categories, product).await
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateProductUseCase<P, S, C, I>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
    I: ImageStore,
{
    pub products: P,
    pub subcategories: S,
    pub categories: C,
    pub images: I,
}

impl<P, S, C, I> CreateProductUseCase<P, S, C, I>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
    I: ImageStore,
{
    pub async fn execute(&self, mut form: ProductForm) -> Result<PopulatedProduct, ApiError> {
        let fields = required_fields(&mut form).ok_or(ApiError::MissingProductFields)?;
        let variants = parse_variants(&fields.variants)?;
        let subcategory_id = require_subcategory(&self.subcategories, &fields.subcategory).await?;

        let images = self.images.save_all(form.images).await?;
        let product = self
            .products
            .create(ProductDraft {
                title: fields.title,
                description: fields.description,
                variants,
                subcategory_id,
                images,
            })
            .await?;

        tracing::info!(product_id = %product.id, "product created");
        populate_one(&self.subcategories, &self.categories, product).await
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P, S, C, I>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
    I: ImageStore,
{
    pub products: P,
    pub subcategories: S,
    pub categories: C,
    pub images: I,
}

impl<P, S, C, I> UpdateProductUseCase<P, S, C, I>
where
    P: ProductRepository,
    S: SubCategoryRepository,
    C: CategoryRepository,
    I: ImageStore,
{
    pub async fn execute(
        &self,
        raw_id: &str,
        mut form: ProductForm,
    ) -> Result<PopulatedProduct, ApiError> {
        let id = parse_product_id(raw_id)?;
        let fields = required_fields(&mut form).ok_or(ApiError::MissingEditProductFields)?;
        let current = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ProductNotFound)?;

        let variants = parse_variants(&fields.variants)?;
        let subcategory_id = require_subcategory(&self.subcategories, &fields.subcategory).await?;
        let keep = form
            .existing_images
            .as_deref()
            .map(parse_existing_images)
            .transpose()?;

        let uploaded = self.images.save_all(form.images).await?;
        let images = match keep {
            // Only filenames already on the product survive.
            Some(keep) => current
                .images
                .into_iter()
                .filter(|img| keep.contains(img))
                .chain(uploaded.iter().cloned())
                .collect(),
            None if uploaded.is_empty() => current.images,
            None => uploaded.clone(),
        };

        let updated = self
            .products
            .update(
                id,
                ProductDraft {
                    title: fields.title,
                    description: fields.description,
                    variants,
                    subcategory_id,
                    images,
                },
            )
            .await;
        let product = match updated {
            Ok(Some(product)) => product,
            failed => {
                // Nothing references this request's uploads once the write fails.
                self.images.remove_all(&uploaded).await;
                return Err(failed.err().unwrap_or(ApiError::ProductNotFound));
            }
        };

        tracing::info!(product_id = %product.id, "product updated");
        populate_one(&self.subcategories, &self.categories, product).await
    }
}
