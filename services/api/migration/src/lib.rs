use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_categories;
mod m20260301_000003_create_sub_categories;
mod m20260301_000004_create_products;
mod m20260301_000005_create_wishlists;
mod m20260301_000006_create_wishlist_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_categories::Migration),
            Box::new(m20260301_000003_create_sub_categories::Migration),
            Box::new(m20260301_000004_create_products::Migration),
            Box::new(m20260301_000005_create_wishlists::Migration),
            Box::new(m20260301_000006_create_wishlist_items::Migration),
        ]
    }
}
