use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use shopfront_api_schema::{categories, products, sub_categories, users, wishlist_items, wishlists};
use shopfront_core::sea_ext::FilterPrefix;
use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};
use shopfront_domain::user::Role;

use crate::domain::repository::{
    CategoryRepository, ProductRepository, Repositories, SubCategoryRepository, UserRepository,
    WishlistRepository,
};
use crate::domain::types::{
    Category, NewUser, Product, ProductDraft, ProductQuery, SubCategory, User, Wishlist,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn raw_ids<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}

// ── Bundle ───────────────────────────────────────────────────────────────────

/// Postgres-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct DbRepositories {
    pub db: DatabaseConnection,
}

impl Repositories for DbRepositories {
    type Users = DbUserRepository;
    type Categories = DbCategoryRepository;
    type SubCategories = DbSubCategoryRepository;
    type Products = DbProductRepository;
    type Wishlists = DbWishlistRepository;

    fn users(&self) -> Self::Users {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    fn categories(&self) -> Self::Categories {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    fn subcategories(&self) -> Self::SubCategories {
        DbSubCategoryRepository {
            db: self.db.clone(),
        }
    }

    fn products(&self) -> Self::Products {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    fn wishlists(&self) -> Self::Wishlists {
        DbWishlistRepository {
            db: self.db.clone(),
        }
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

fn user_from_model(m: users::Model) -> Result<User, ApiError> {
    let role = m.role.parse::<Role>().context("parse user role")?;
    Ok(User {
        id: UserId(m.id),
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        refresh_token: m.refresh_token,
        role,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?
            .map(user_from_model)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?
            .map(user_from_model)
            .transpose()
    }

    async fn exists_by_email_or_name(&self, email: &str, name: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(
                users::Column::Email
                    .eq(email)
                    .or(users::Column::Name.eq(name)),
            )
            .count(&self.db)
            .await
            .context("check user exists")?;
        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(user.id.0),
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            refresh_token: Set(user.refresh_token),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match model {
            Ok(m) => user_from_model(m),
            Err(e) if is_unique_violation(&e) => Err(ApiError::UserExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn set_refresh_token(&self, id: UserId, token: Option<String>) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(users::Column::RefreshToken, Expr::value(token))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("set refresh token")?;
        Ok(())
    }

    async fn clear_refresh_token_matching(&self, token: &str) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::RefreshToken, Expr::value(Option::<String>::None))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::RefreshToken.eq(token))
            .exec(&self.db)
            .await
            .context("clear refresh token")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

fn category_from_model(m: categories::Model) -> Category {
    Category {
        id: CategoryId(m.id),
        name: m.name,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, ApiError> {
        let model = categories::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find category by id")?;
        Ok(model.map(category_from_model))
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = categories::Entity::find()
            .filter(categories::Column::Id.is_in(raw_ids(ids)))
            .all(&self.db)
            .await
            .context("find categories by ids")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find category by name")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, name: &str) -> Result<Category, ApiError> {
        let now = Utc::now();
        let result = categories::ActiveModel {
            id: Set(CategoryId::new().0),
            name: Set(name.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(m) => Ok(category_from_model(m)),
            Err(e) if is_unique_violation(&e) => Err(ApiError::CategoryExists),
            Err(e) => Err(anyhow::Error::new(e).context("create category").into()),
        }
    }
}

// ── Subcategory repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubCategoryRepository {
    pub db: DatabaseConnection,
}

fn subcategory_from_model(m: sub_categories::Model) -> SubCategory {
    SubCategory {
        id: SubCategoryId(m.id),
        name: m.name,
        category_id: CategoryId(m.category_id),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

impl SubCategoryRepository for DbSubCategoryRepository {
    async fn list(&self) -> Result<Vec<SubCategory>, ApiError> {
        let models = sub_categories::Entity::find()
            .order_by_asc(sub_categories::Column::Name)
            .all(&self.db)
            .await
            .context("list subcategories")?;
        Ok(models.into_iter().map(subcategory_from_model).collect())
    }

    async fn find_by_id(&self, id: SubCategoryId) -> Result<Option<SubCategory>, ApiError> {
        let model = sub_categories::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find subcategory by id")?;
        Ok(model.map(subcategory_from_model))
    }

    async fn find_by_ids(&self, ids: &[SubCategoryId]) -> Result<Vec<SubCategory>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = sub_categories::Entity::find()
            .filter(sub_categories::Column::Id.is_in(raw_ids(ids)))
            .all(&self.db)
            .await
            .context("find subcategories by ids")?;
        Ok(models.into_iter().map(subcategory_from_model).collect())
    }

    async fn find_in_category(
        &self,
        name: &str,
        category_id: CategoryId,
    ) -> Result<Option<SubCategory>, ApiError> {
        let model = sub_categories::Entity::find()
            .filter(sub_categories::Column::Name.eq(name))
            .filter(sub_categories::Column::CategoryId.eq(category_id.0))
            .one(&self.db)
            .await
            .context("find subcategory in category")?;
        Ok(model.map(subcategory_from_model))
    }

    async fn create(&self, name: &str, category_id: CategoryId) -> Result<SubCategory, ApiError> {
        let now = Utc::now();
        let result = sub_categories::ActiveModel {
            id: Set(SubCategoryId::new().0),
            name: Set(name.to_owned()),
            category_id: Set(category_id.0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(m) => Ok(subcategory_from_model(m)),
            Err(e) if is_unique_violation(&e) => Err(ApiError::SubCategoryExists),
            Err(e) => Err(anyhow::Error::new(e).context("create subcategory").into()),
        }
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

fn product_from_model(m: products::Model) -> Result<Product, ApiError> {
    Ok(Product {
        id: ProductId(m.id),
        title: m.title,
        description: m.description,
        variants: serde_json::from_value(m.variants).context("decode product variants")?,
        images: serde_json::from_value(m.images).context("decode product images")?,
        subcategory_id: SubCategoryId(m.subcategory_id),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn draft_json(draft: &ProductDraft) -> Result<(serde_json::Value, serde_json::Value), ApiError> {
    let variants = serde_json::to_value(&draft.variants).context("encode product variants")?;
    let images = serde_json::to_value(&draft.images).context("encode product images")?;
    Ok((variants, images))
}

impl ProductRepository for DbProductRepository {
    async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, u64), ApiError> {
        let mut select = products::Entity::find();
        if let Some(search) = &query.search {
            select = select.filter_prefix_ci(products::Column::Title, search);
        }
        if let Some(subcategory) = query.subcategory {
            select = select.filter(products::Column::SubcategoryId.eq(subcategory.0));
        }

        let total = select
            .clone()
            .count(&self.db)
            .await
            .context("count products")?;

        let page = query.page.clamped();
        let models = select
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list products")?;

        let items = models
            .into_iter()
            .map(product_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find product by id")?
            .map(product_from_model)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        products::Entity::find()
            .filter(products::Column::Id.is_in(raw_ids(ids)))
            .all(&self.db)
            .await
            .context("find products by ids")?
            .into_iter()
            .map(product_from_model)
            .collect()
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        let (variants, images) = draft_json(&draft)?;
        let now = Utc::now();
        let model = products::ActiveModel {
            id: Set(ProductId::new().0),
            title: Set(draft.title),
            description: Set(draft.description),
            variants: Set(variants),
            images: Set(images),
            subcategory_id: Set(draft.subcategory_id.0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        product_from_model(model)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Option<Product>, ApiError> {
        let (variants, images) = draft_json(&draft)?;
        let result = products::Entity::update_many()
            .col_expr(products::Column::Title, Expr::value(draft.title))
            .col_expr(products::Column::Description, Expr::value(draft.description))
            .col_expr(products::Column::Variants, Expr::value(variants))
            .col_expr(products::Column::Images, Expr::value(images))
            .col_expr(
                products::Column::SubcategoryId,
                Expr::value(draft.subcategory_id.0),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(products::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update product")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}

// ── Wishlist repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWishlistRepository {
    pub db: DatabaseConnection,
}

impl DbWishlistRepository {
    async fn load(&self, model: wishlists::Model) -> Result<Wishlist, ApiError> {
        let items = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::WishlistId.eq(model.id))
            .order_by_asc(wishlist_items::Column::AddedAt)
            .order_by_asc(wishlist_items::Column::ProductId)
            .all(&self.db)
            .await
            .context("load wishlist items")?;
        Ok(Wishlist {
            id: WishlistId(model.id),
            user_id: UserId(model.user_id),
            product_ids: items.into_iter().map(|i| ProductId(i.product_id)).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn touch(&self, wishlist_id: WishlistId) -> Result<(), ApiError> {
        wishlists::Entity::update_many()
            .col_expr(wishlists::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wishlists::Column::Id.eq(wishlist_id.0))
            .exec(&self.db)
            .await
            .context("touch wishlist")?;
        Ok(())
    }
}

impl WishlistRepository for DbWishlistRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Wishlist>, ApiError> {
        let model = wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .context("find wishlist by user")?;
        match model {
            Some(m) => Ok(Some(self.load(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Wishlist, ApiError> {
        let now = Utc::now();
        // Concurrent first adds race on the unique user_id; the loser re-reads.
        wishlists::Entity::insert(wishlists::ActiveModel {
            id: Set(WishlistId::new().0),
            user_id: Set(user_id.0),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::column(wishlists::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("create wishlist")?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("wishlist missing after insert").into())
    }

    async fn add_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, ApiError> {
        let inserted = wishlist_items::Entity::insert(wishlist_items::ActiveModel {
            wishlist_id: Set(wishlist_id.0),
            product_id: Set(product_id.0),
            added_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([
                wishlist_items::Column::WishlistId,
                wishlist_items::Column::ProductId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("add wishlist item")?;

        if inserted == 0 {
            return Ok(false);
        }
        self.touch(wishlist_id).await?;
        Ok(true)
    }

    async fn remove_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, ApiError> {
        let result = wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::WishlistId.eq(wishlist_id.0))
            .filter(wishlist_items::Column::ProductId.eq(product_id.0))
            .exec(&self.db)
            .await
            .context("remove wishlist item")?;

        if result.rows_affected == 0 {
            return Ok(false);
        }
        self.touch(wishlist_id).await?;
        Ok(true)
    }

    async fn clear(&self, wishlist_id: WishlistId) -> Result<Wishlist, ApiError> {
        wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::WishlistId.eq(wishlist_id.0))
            .exec(&self.db)
            .await
            .context("clear wishlist")?;
        self.touch(wishlist_id).await?;

        let model = wishlists::Entity::find_by_id(wishlist_id.0)
            .one(&self.db)
            .await
            .context("find wishlist by id")?
            .ok_or(ApiError::WishlistNotFound)?;
        self.load(model).await
    }
}
