//! Event entity model
//!
//! Tenant-scoped calendar entries. Events flagged with `is_featured_banner`
//! appear in the homepage banner feed.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "events")]
#[schema(as = Event)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tenant_id: i32,

    pub title: String,

    pub description: Option<String>,

    #[schema(value_type = String, format = DateTime)]
    pub start_date: DateTimeWithTimeZone,

    /// Never earlier than `start_date` when present
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_date: Option<DateTimeWithTimeZone>,

    pub location: Option<String>,

    pub image_url: Option<String>,

    pub is_featured_banner: bool,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
