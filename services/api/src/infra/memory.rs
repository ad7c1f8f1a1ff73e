//! In-process store backing every repository trait. Used by tests and for
//! running the API without a database.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId, UserId, WishlistId};

use crate::domain::repository::{
    CategoryRepository, ProductRepository, Repositories, SubCategoryRepository, UserRepository,
    WishlistRepository,
};
use crate::domain::types::{
    Category, NewUser, Product, ProductDraft, ProductQuery, SubCategory, User, Wishlist,
};
use crate::error::ApiError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    subcategories: Vec<SubCategory>,
    products: Vec<Product>,
    wishlists: Vec<Wishlist>,
    /// Membership index mirroring every `Wishlist::product_ids`.
    wishlist_items: HashSet<(WishlistId, ProductId)>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl Repositories for MemoryStore {
    type Users = MemoryStore;
    type Categories = MemoryStore;
    type SubCategories = MemoryStore;
    type Products = MemoryStore;
    type Wishlists = MemoryStore;

    fn users(&self) -> Self::Users {
        self.clone()
    }

    fn categories(&self) -> Self::Categories {
        self.clone()
    }

    fn subcategories(&self) -> Self::SubCategories {
        self.clone()
    }

    fn products(&self) -> Self::Products {
        self.clone()
    }

    fn wishlists(&self) -> Self::Wishlists {
        self.clone()
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email_or_name(&self, email: &str, name: &str) -> Result<bool, ApiError> {
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.email == email || u.name == name))
    }

    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email || u.name == user.name)
        {
            return Err(ApiError::UserExists);
        }
        let now = Utc::now();
        let user = User {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            refresh_token: user.refresh_token,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn set_refresh_token(&self, id: UserId, token: Option<String>) -> Result<(), ApiError> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.refresh_token = token;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_refresh_token_matching(&self, token: &str) -> Result<bool, ApiError> {
        let mut tables = self.lock();
        let mut matched = false;
        for user in tables
            .users
            .iter_mut()
            .filter(|u| u.refresh_token.as_deref() == Some(token))
        {
            user.refresh_token = None;
            user.updated_at = Utc::now();
            matched = true;
        }
        Ok(matched)
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, ApiError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, ApiError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create(&self, name: &str) -> Result<Category, ApiError> {
        let mut tables = self.lock();
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(ApiError::CategoryExists);
        }
        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }
}

// ── Subcategories ────────────────────────────────────────────────────────────

impl SubCategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<SubCategory>, ApiError> {
        let mut subs = self.lock().subcategories.clone();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subs)
    }

    async fn find_by_id(&self, id: SubCategoryId) -> Result<Option<SubCategory>, ApiError> {
        Ok(self
            .lock()
            .subcategories
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[SubCategoryId]) -> Result<Vec<SubCategory>, ApiError> {
        Ok(self
            .lock()
            .subcategories
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn find_in_category(
        &self,
        name: &str,
        category_id: CategoryId,
    ) -> Result<Option<SubCategory>, ApiError> {
        Ok(self
            .lock()
            .subcategories
            .iter()
            .find(|s| s.name == name && s.category_id == category_id)
            .cloned())
    }

    async fn create(&self, name: &str, category_id: CategoryId) -> Result<SubCategory, ApiError> {
        let mut tables = self.lock();
        if tables
            .subcategories
            .iter()
            .any(|s| s.name == name && s.category_id == category_id)
        {
            return Err(ApiError::SubCategoryExists);
        }
        let now = Utc::now();
        let sub = SubCategory {
            id: SubCategoryId::new(),
            name: name.to_owned(),
            category_id,
            created_at: now,
            updated_at: now,
        };
        tables.subcategories.push(sub.clone());
        Ok(sub)
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

impl ProductRepository for MemoryStore {
    async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, u64), ApiError> {
        let search = query.search.as_deref().map(str::to_lowercase);
        let mut matches: Vec<Product> = self
            .lock()
            .products
            .iter()
            .filter(|p| query.subcategory.is_none_or(|s| p.subcategory_id == s))
            .filter(|p| {
                search
                    .as_deref()
                    .is_none_or(|s| p.title.to_lowercase().starts_with(s))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matches.len() as u64;
        let page = query.page.clamped();
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            title: draft.title,
            description: draft.description,
            variants: draft.variants,
            images: draft.images,
            subcategory_id: draft.subcategory_id,
            created_at: now,
            updated_at: now,
        };
        self.lock().products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Option<Product>, ApiError> {
        let mut tables = self.lock();
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.title = draft.title;
        product.description = draft.description;
        product.variants = draft.variants;
        product.images = draft.images;
        product.subcategory_id = draft.subcategory_id;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }
}

// ── Wishlists ────────────────────────────────────────────────────────────────

impl WishlistRepository for MemoryStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Wishlist>, ApiError> {
        Ok(self
            .lock()
            .wishlists
            .iter()
            .find(|w| w.user_id == user_id)
            .cloned())
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Wishlist, ApiError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.wishlists.iter().find(|w| w.user_id == user_id) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let wishlist = Wishlist {
            id: WishlistId::new(),
            user_id,
            product_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.wishlists.push(wishlist.clone());
        Ok(wishlist)
    }

    async fn add_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, ApiError> {
        let mut guard = self.lock();
        let tables = &mut *guard;
        let wishlist = tables
            .wishlists
            .iter_mut()
            .find(|w| w.id == wishlist_id)
            .ok_or(ApiError::WishlistNotFound)?;
        if !tables.wishlist_items.insert((wishlist_id, product_id)) {
            return Ok(false);
        }
        wishlist.product_ids.push(product_id);
        wishlist.updated_at = Utc::now();
        Ok(true)
    }

    async fn remove_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, ApiError> {
        let mut guard = self.lock();
        let tables = &mut *guard;
        if !tables.wishlist_items.remove(&(wishlist_id, product_id)) {
            return Ok(false);
        }
        if let Some(wishlist) = tables.wishlists.iter_mut().find(|w| w.id == wishlist_id) {
            wishlist.product_ids.retain(|id| *id != product_id);
            wishlist.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn clear(&self, wishlist_id: WishlistId) -> Result<Wishlist, ApiError> {
        let mut guard = self.lock();
        let tables = &mut *guard;
        tables.wishlist_items.retain(|(w, _)| *w != wishlist_id);
        let wishlist = tables
            .wishlists
            .iter_mut()
            .find(|w| w.id == wishlist_id)
            .ok_or(ApiError::WishlistNotFound)?;
        wishlist.product_ids.clear();
        wishlist.updated_at = Utc::now();
        Ok(wishlist.clone())
    }
}
