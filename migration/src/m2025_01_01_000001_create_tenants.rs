//! Migration to create the tenants table.
//!
//! Creates the baseline tenants table and seeds the default parish tenant
//! that every request currently resolves to.

use sea_orm_migration::prelude::*;

const DEFAULT_TENANT_ID: i32 = 1;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tenants::Name).text().not_null())
                    .col(ColumnDef::new(Tenants::Domain).text().not_null())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_domain")
                    .table(Tenants::Table)
                    .col(Tenants::Domain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(Tenants::Table)
            .columns([Tenants::Id, Tenants::Name, Tenants::Domain])
            .values_panic([
                DEFAULT_TENANT_ID.into(),
                "Gislev Kirke".into(),
                "gislevkirke.dk".into(),
            ])
            .to_owned();

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_tenants_domain").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Domain,
    CreatedAt,
    UpdatedAt,
}
