//! Event repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use super::Page;
use crate::banners::EventStore;
use crate::error::RepositoryError;
use crate::models::event::{self, Entity as Event};
use crate::tenant::TenantId;

/// Filters for listing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub featured: Option<bool>,
    pub page: Page,
}

/// Values for a new event. Dates must already be validated.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_featured_banner: bool,
}

/// Partial update. `None` leaves a field untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub is_featured_banner: Option<bool>,
}

/// Repository for event database operations
#[derive(Debug, Clone)]
pub struct EventRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl EventRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(tenant: TenantId, featured: Option<bool>) -> sea_orm::Select<Event> {
        let mut query = Event::find().filter(event::Column::TenantId.eq(tenant.0));
        if let Some(featured) = featured {
            query = query.filter(event::Column::IsFeaturedBanner.eq(featured));
        }
        query
    }

    /// Events of `tenant` ordered by start date, earliest first.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: EventFilter,
    ) -> Result<Vec<event::Model>, RepositoryError> {
        let query = Self::scoped(tenant, filter.featured)
            .order_by_asc(event::Column::StartDate)
            .order_by_asc(event::Column::Id);

        filter
            .page
            .apply(query)
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Number of events matching the filter, ignoring pagination.
    pub async fn count(
        &self,
        tenant: TenantId,
        featured: Option<bool>,
    ) -> Result<u64, RepositoryError> {
        Self::scoped(tenant, featured)
            .count(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<event::Model>, RepositoryError> {
        Event::find_by_id(id)
            .filter(event::Column::TenantId.eq(tenant.0))
            .one(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn create(
        &self,
        tenant: TenantId,
        new: NewEvent,
    ) -> Result<event::Model, RepositoryError> {
        if new.end_date.is_some_and(|end| end < new.start_date) {
            return Err(RepositoryError::validation_error(
                "End date cannot be before start date",
            ));
        }

        let now = Utc::now();
        let active_model = event::ActiveModel {
            tenant_id: Set(tenant.0),
            title: Set(new.title),
            description: Set(new.description),
            start_date: Set(new.start_date.into()),
            end_date: Set(new.end_date.map(Into::into)),
            location: Set(new.location),
            image_url: Set(new.image_url),
            is_featured_banner: Set(new.is_featured_banner),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        active_model
            .insert(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Apply `changes` to an event. Returns `None` when the event does not
    /// exist for `tenant`.
    pub async fn update(
        &self,
        id: i32,
        tenant: TenantId,
        changes: EventChanges,
    ) -> Result<Option<event::Model>, RepositoryError> {
        let Some(existing) = self.get(id, tenant).await? else {
            return Ok(None);
        };

        let start = changes
            .start_date
            .unwrap_or_else(|| existing.start_date.with_timezone(&Utc));
        let end = match changes.end_date {
            Some(end) => end,
            None => existing.end_date.map(|end| end.with_timezone(&Utc)),
        };
        if end.is_some_and(|end| end < start) {
            return Err(RepositoryError::validation_error(
                "End date cannot be before start date",
            ));
        }

        let mut active_model: event::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(description);
        }
        if let Some(start_date) = changes.start_date {
            active_model.start_date = Set(start_date.into());
        }
        if let Some(end_date) = changes.end_date {
            active_model.end_date = Set(end_date.map(Into::into));
        }
        if let Some(location) = changes.location {
            active_model.location = Set(location);
        }
        if let Some(image_url) = changes.image_url {
            active_model.image_url = Set(image_url);
        }
        if let Some(is_featured_banner) = changes.is_featured_banner {
            active_model.is_featured_banner = Set(is_featured_banner);
        }
        active_model.updated_at = Set(Utc::now().into());

        active_model
            .update(&*self.db)
            .await
            .map(Some)
            .map_err(RepositoryError::database_error)
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete(&self, id: i32, tenant: TenantId) -> Result<bool, RepositoryError> {
        let result = Event::delete_many()
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::TenantId.eq(tenant.0))
            .exec(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn find_featured_by_tenant(
        &self,
        tenant: TenantId,
    ) -> Result<Vec<event::Model>, RepositoryError> {
        self.list(
            tenant,
            EventFilter {
                featured: Some(true),
                page: Page::default(),
            },
        )
        .await
    }

    async fn find_by_id(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<event::Model>, RepositoryError> {
        self.get(id, tenant).await
    }
}
