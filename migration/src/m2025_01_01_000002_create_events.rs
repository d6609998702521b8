//! Migration to create the events table.
//!
//! Events are tenant-scoped calendar entries. The `is_featured_banner` flag
//! promotes an event into the homepage banner feed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::TenantId).integer().not_null())
                    .col(ColumnDef::new(Events::Title).text().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(
                        ColumnDef::new(Events::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Events::Location).text().null())
                    .col(ColumnDef::new(Events::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(Events::IsFeaturedBanner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_tenant_id")
                            .from(Events::Table, Events::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always tenant-scoped and ordered by start date
        manager
            .create_index(
                Index::create()
                    .name("idx_events_tenant_start_date")
                    .table(Events::Table)
                    .col(Events::TenantId)
                    .col(Events::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_tenant_featured")
                    .table(Events::Table)
                    .col(Events::TenantId)
                    .col(Events::IsFeaturedBanner)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_events_tenant_featured").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_events_tenant_start_date")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    TenantId,
    Title,
    Description,
    StartDate,
    EndDate,
    Location,
    ImageUrl,
    IsFeaturedBanner,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
