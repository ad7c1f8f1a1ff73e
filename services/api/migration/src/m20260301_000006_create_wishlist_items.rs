use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WishlistItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WishlistItems::WishlistId).uuid().not_null())
                    .col(ColumnDef::new(WishlistItems::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(WishlistItems::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(WishlistItems::WishlistId)
                            .col(WishlistItems::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WishlistItems::Table, WishlistItems::WishlistId)
                            .to(Wishlists::Table, Wishlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WishlistItems::Table, WishlistItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WishlistItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WishlistItems {
    Table,
    WishlistId,
    ProductId,
    AddedAt,
}

#[derive(Iden)]
enum Wishlists {
    Table,
    Id,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
