//! Database migrations for the Church Site API.
//!
//! This module contains the schema definitions applied at service startup
//! using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_01_000001_create_tenants;
mod m2025_01_01_000002_create_events;
mod m2025_01_01_000003_create_info;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_01_000001_create_tenants::Migration),
            Box::new(m2025_01_01_000002_create_events::Migration),
            Box::new(m2025_01_01_000003_create_info::Migration),
        ]
    }
}
