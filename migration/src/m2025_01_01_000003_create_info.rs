//! Migration to create the info table.
//!
//! Info rows are tenant-scoped news items, announcements and general posts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Info::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Info::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Info::TenantId).integer().not_null())
                    .col(ColumnDef::new(Info::Title).text().not_null())
                    .col(ColumnDef::new(Info::Content).text().not_null())
                    .col(
                        ColumnDef::new(Info::Type)
                            .text()
                            .not_null()
                            .default("general"),
                    )
                    .col(ColumnDef::new(Info::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(Info::IsFeaturedBanner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Info::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Info::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Info::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_info_tenant_id")
                            .from(Info::Table, Info::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_info_tenant_published_at")
                    .table(Info::Table)
                    .col(Info::TenantId)
                    .col(Info::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_info_tenant_featured")
                    .table(Info::Table)
                    .col(Info::TenantId)
                    .col(Info::IsFeaturedBanner)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_info_tenant_featured").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_info_tenant_published_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Info::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Info {
    Table,
    Id,
    TenantId,
    Title,
    Content,
    Type,
    ImageUrl,
    IsFeaturedBanner,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
