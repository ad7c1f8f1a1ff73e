use std::collections::{HashMap, HashSet};

use shopfront_domain::id::CategoryId;

use crate::domain::repository::{CategoryRepository, SubCategoryRepository};
use crate::domain::types::{
    Category, PopulatedProduct, PopulatedSubCategory, Product, SubCategory,
};
use crate::error::ApiError;

// ── Populate helpers ─────────────────────────────────────────────────────────

fn unique<T: Copy + Eq + std::hash::Hash>(ids: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Resolve each subcategory's parent category.
pub async fn populate_subcategories<C: CategoryRepository>(
    categories: &C,
    subcategories: Vec<SubCategory>,
) -> Result<Vec<PopulatedSubCategory>, ApiError> {
    let ids = unique(subcategories.iter().map(|s| s.category_id));
    let by_id: HashMap<CategoryId, Category> = categories
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(subcategories
        .into_iter()
        .map(|subcategory| PopulatedSubCategory {
            category: by_id.get(&subcategory.category_id).cloned(),
            subcategory,
        })
        .collect())
}

/// Resolve each product's subcategory and that subcategory's category.
pub async fn populate_products<S: SubCategoryRepository, C: CategoryRepository>(
    subcategories: &S,
    categories: &C,
    products: Vec<Product>,
) -> Result<Vec<PopulatedProduct>, ApiError> {
    let ids = unique(products.iter().map(|p| p.subcategory_id));
    let subs = subcategories.find_by_ids(&ids).await?;
    let by_id: HashMap<_, _> = populate_subcategories(categories, subs)
        .await?
        .into_iter()
        .map(|s| (s.subcategory.id, s))
        .collect();

    Ok(products
        .into_iter()
        .map(|product| PopulatedProduct {
            subcategory: by_id.get(&product.subcategory_id).cloned(),
            product,
        })
        .collect())
}

// ── Categories ───────────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<C: CategoryRepository> {
    pub categories: C,
}

impl<C: CategoryRepository> ListCategoriesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Category>, ApiError> {
        self.categories.list().await
    }
}

pub struct CreateCategoryUseCase<C: CategoryRepository> {
    pub categories: C,
}

impl<C: CategoryRepository> CreateCategoryUseCase<C> {
    pub async fn execute(&self, name: &str) -> Result<Category, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::MissingCategoryName);
        }
        if self.categories.find_by_name(name).await?.is_some() {
            return Err(ApiError::CategoryExists);
        }
        let category = self.categories.create(name).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }
}

// ── Subcategories ────────────────────────────────────────────────────────────

pub struct ListSubCategoriesUseCase<S: SubCategoryRepository, C: CategoryRepository> {
    pub subcategories: S,
    pub categories: C,
}

impl<S: SubCategoryRepository, C: CategoryRepository> ListSubCategoriesUseCase<S, C> {
    pub async fn execute(&self) -> Result<Vec<PopulatedSubCategory>, ApiError> {
        let subs = self.subcategories.list().await?;
        populate_subcategories(&self.categories, subs).await
    }
}

pub struct CreateSubCategoryInput {
    pub name: String,
    /// Raw id as sent by the client; parsed here.
    pub category_id: String,
}

pub struct CreateSubCategoryUseCase<S: SubCategoryRepository, C: CategoryRepository> {
    pub subcategories: S,
    pub categories: C,
}

impl<S: SubCategoryRepository, C: CategoryRepository> CreateSubCategoryUseCase<S, C> {
    pub async fn execute(
        &self,
        input: CreateSubCategoryInput,
    ) -> Result<PopulatedSubCategory, ApiError> {
        let name = input.name.trim();
        let raw_category = input.category_id.trim();
        if name.is_empty() || raw_category.is_empty() {
            return Err(ApiError::MissingSubCategoryFields);
        }

        let category_id = raw_category
            .parse::<CategoryId>()
            .map_err(|_| ApiError::CategoryNotFound)?;
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or(ApiError::CategoryNotFound)?;

        if self
            .subcategories
            .find_in_category(name, category.id)
            .await?
            .is_some()
        {
            return Err(ApiError::SubCategoryExists);
        }

        let subcategory = self.subcategories.create(name, category.id).await?;
        tracing::info!(
            subcategory_id = %subcategory.id,
            category_id = %category.id,
            "subcategory created"
        );
        Ok(PopulatedSubCategory {
            subcategory,
            category: Some(category),
        })
    }
}
