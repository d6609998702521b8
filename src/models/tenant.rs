//! Tenant entity model
//!
//! Every event and info row belongs to exactly one tenant.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name shown in the `X-Tenant-Name` header
    pub name: String,

    /// Public domain of the tenant site (unique)
    pub domain: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
    #[sea_orm(has_many = "super::info::Entity")]
    Info,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Info.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
