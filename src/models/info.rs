//! Info entity model
//!
//! Tenant-scoped news items, announcements and general posts.

use std::{fmt, str::FromStr};

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "info")]
#[schema(as = Info)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tenant_id: i32,

    pub title: String,

    pub content: String,

    /// One of `news`, `announcement` or `general`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    pub image_url: Option<String>,

    pub is_featured_banner: bool,

    #[schema(value_type = String, format = DateTime)]
    pub published_at: DateTimeWithTimeZone,

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

/// Category of an info post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InfoType {
    News,
    Announcement,
    #[default]
    General,
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::News => "news",
            InfoType::Announcement => "announcement",
            InfoType::General => "general",
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known info types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInfoType;

impl FromStr for InfoType {
    type Err = UnknownInfoType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(InfoType::News),
            "announcement" => Ok(InfoType::Announcement),
            "general" => Ok(InfoType::General),
            _ => Err(UnknownInfoType),
        }
    }
}
