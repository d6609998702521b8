//! Info repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use super::Page;
use crate::banners::InfoStore;
use crate::error::RepositoryError;
use crate::models::info::{self, Entity as Info, InfoType};
use crate::tenant::TenantId;

/// Filters for listing info posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoFilter {
    pub featured: Option<bool>,
    pub kind: Option<InfoType>,
    pub page: Page,
}

#[derive(Debug, Clone)]
pub struct NewInfo {
    pub title: String,
    pub content: String,
    pub kind: InfoType,
    pub image_url: Option<String>,
    pub is_featured_banner: bool,
    pub published_at: DateTime<Utc>,
}

/// Partial update. `None` leaves a field untouched; `Some(None)` clears `image_url`.
#[derive(Debug, Clone, Default)]
pub struct InfoChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<InfoType>,
    pub image_url: Option<Option<String>>,
    pub is_featured_banner: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Repository for info database operations
#[derive(Debug, Clone)]
pub struct InfoRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl InfoRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(
        tenant: TenantId,
        featured: Option<bool>,
        kind: Option<InfoType>,
    ) -> sea_orm::Select<Info> {
        let mut query = Info::find().filter(info::Column::TenantId.eq(tenant.0));
        if let Some(featured) = featured {
            query = query.filter(info::Column::IsFeaturedBanner.eq(featured));
        }
        if let Some(kind) = kind {
            query = query.filter(info::Column::Kind.eq(kind.as_str()));
        }
        query
    }

    /// Info posts of `tenant`, most recently published first.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: InfoFilter,
    ) -> Result<Vec<info::Model>, RepositoryError> {
        let query = Self::scoped(tenant, filter.featured, filter.kind)
            .order_by_desc(info::Column::PublishedAt)
            .order_by_desc(info::Column::Id);

        filter
            .page
            .apply(query)
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn count(
        &self,
        tenant: TenantId,
        featured: Option<bool>,
        kind: Option<InfoType>,
    ) -> Result<u64, RepositoryError> {
        Self::scoped(tenant, featured, kind)
            .count(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<info::Model>, RepositoryError> {
        Info::find_by_id(id)
            .filter(info::Column::TenantId.eq(tenant.0))
            .one(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn create(
        &self,
        tenant: TenantId,
        new: NewInfo,
    ) -> Result<info::Model, RepositoryError> {
        let now = Utc::now();
        let active_model = info::ActiveModel {
            tenant_id: Set(tenant.0),
            title: Set(new.title),
            content: Set(new.content),
            kind: Set(new.kind.as_str().to_string()),
            image_url: Set(new.image_url),
            is_featured_banner: Set(new.is_featured_banner),
            published_at: Set(new.published_at.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        active_model
            .insert(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Returns `None` when the post does not exist for `tenant`.
    pub async fn update(
        &self,
        id: i32,
        tenant: TenantId,
        changes: InfoChanges,
    ) -> Result<Option<info::Model>, RepositoryError> {
        let Some(existing) = self.get(id, tenant).await? else {
            return Ok(None);
        };

        let mut active_model: info::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(content) = changes.content {
            active_model.content = Set(content);
        }
        if let Some(kind) = changes.kind {
            active_model.kind = Set(kind.as_str().to_string());
        }
        if let Some(image_url) = changes.image_url {
            active_model.image_url = Set(image_url);
        }
        if let Some(is_featured_banner) = changes.is_featured_banner {
            active_model.is_featured_banner = Set(is_featured_banner);
        }
        if let Some(published_at) = changes.published_at {
            active_model.published_at = Set(published_at.into());
        }
        active_model.updated_at = Set(Utc::now().into());

        active_model
            .update(&*self.db)
            .await
            .map(Some)
            .map_err(RepositoryError::database_error)
    }

    pub async fn delete(&self, id: i32, tenant: TenantId) -> Result<bool, RepositoryError> {
        let result = Info::delete_many()
            .filter(info::Column::Id.eq(id))
            .filter(info::Column::TenantId.eq(tenant.0))
            .exec(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl InfoStore for InfoRepository {
    async fn find_featured_by_tenant(
        &self,
        tenant: TenantId,
    ) -> Result<Vec<info::Model>, RepositoryError> {
        self.list(
            tenant,
            InfoFilter {
                featured: Some(true),
                ..InfoFilter::default()
            },
        )
        .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<info::Model>, RepositoryError> {
        self.get(id, tenant).await
    }
}
