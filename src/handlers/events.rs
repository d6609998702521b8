//! # Events API Handlers
//!
//! CRUD endpoints for tenant-scoped events.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ContentError, storage_failure};
use crate::handlers::types::{
    ApiResponse, MessageResponse, PageParams, Pagination, deserialize_nullable, nullable_text,
    optional_instant, optional_text, parse_featured, parse_id, required_instant, required_text,
};
use crate::models::event;
use crate::repositories::{EventChanges, EventFilter, NewEvent};
use crate::server::AppState;
use crate::tenant::TenantExtension;

/// Query parameters for listing events
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventsQuery {
    /// `true` or `false` to filter on the featured flag
    pub featured: Option<String>,
    /// Page size (1-100)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    /// Rows to skip (>= 0)
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventList {
    pub events: Vec<event::Model>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventData {
    pub event: event::Model,
}

/// Body for creating an event. Dates accept RFC 3339 or `YYYY-MM-DD[ HH:MM:SS]`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_featured_banner: Option<bool>,
}

/// Body for a partial event update. `null` clears optional fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub end_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub image_url: Option<Option<String>>,
    pub is_featured_banner: Option<bool>,
}

impl CreateEventRequest {
    fn into_new_event(self) -> Result<NewEvent, ContentError> {
        let title = required_text(self.title, "title")?;
        let start_date = required_instant(self.start_date.as_deref(), "start_date")?;
        let end_date = optional_instant(self.end_date.as_deref(), "end_date")?;

        if end_date.is_some_and(|end| end < start_date) {
            return Err(ContentError::EndBeforeStart);
        }

        Ok(NewEvent {
            title,
            description: optional_text(self.description),
            start_date,
            end_date,
            location: optional_text(self.location),
            image_url: optional_text(self.image_url),
            is_featured_banner: self.is_featured_banner.unwrap_or(false),
        })
    }
}

impl UpdateEventRequest {
    fn into_changes(self) -> Result<EventChanges, ContentError> {
        let start_date = optional_instant(self.start_date.as_deref(), "start_date")?;
        let end_date = match nullable_text(self.end_date) {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(optional_instant(Some(&raw), "end_date")?),
        };

        if let (Some(start), Some(Some(end))) = (start_date, end_date) {
            if end < start {
                return Err(ContentError::EndBeforeStart);
            }
        }

        Ok(EventChanges {
            title: optional_text(self.title),
            description: nullable_text(self.description),
            start_date,
            end_date,
            location: nullable_text(self.location),
            image_url: nullable_text(self.image_url),
            is_featured_banner: self.is_featured_banner,
        })
    }
}

/// List events ordered by start date
#[utoipa::path(
    get,
    path = "/api/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events", body = ApiResponse<EventList>),
        (status = 400, description = "Invalid limit or offset", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<EventList>>, ApiError> {
    let Query(query) = query?;
    let page = PageParams::parse(query.limit.as_deref(), query.offset.as_deref())?;
    let featured = parse_featured(query.featured.as_deref());
    let tenant_id = tenant.tenant_id();

    let filter = EventFilter {
        featured,
        page: page.page(),
    };
    let (events, total) = tokio::try_join!(
        state.events.list(tenant_id, filter),
        state.events.count(tenant_id, featured),
    )
    .map_err(|err| storage_failure(err, "Failed to fetch events"))?;

    Ok(Json(ApiResponse::ok(EventList {
        events,
        pagination: page.pagination(total),
    })))
}

/// Fetch a single event
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = ApiResponse<EventData>),
        (status = 400, description = "Invalid event ID", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<EventData>>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "event")?;

    let event = state
        .events
        .get(id, tenant.tenant_id())
        .await
        .map_err(|err| storage_failure(err, "Failed to fetch event"))?
        .ok_or(ContentError::NotFound("Event"))?;

    Ok(Json(ApiResponse::ok(EventData { event })))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventData>),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<EventData>>), ApiError> {
    let Json(payload) = payload?;
    let new_event = payload.into_new_event()?;

    let event = state
        .events
        .create(tenant.tenant_id(), new_event)
        .await
        .map_err(|err| storage_failure(err, "Failed to create event"))?;

    tracing::info!(tenant_id = tenant.id, event_id = event.id, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            EventData { event },
            "Event created successfully",
        )),
    ))
}

/// Partially update an event
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventData>),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EventData>>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "event")?;
    let Json(payload) = payload?;
    let changes = payload.into_changes()?;

    let event = state
        .events
        .update(id, tenant.tenant_id(), changes)
        .await
        .map_err(|err| storage_failure(err, "Failed to update event"))?
        .ok_or(ContentError::NotFound("Event"))?;

    Ok(Json(ApiResponse::with_message(
        EventData { event },
        "Event updated successfully",
    )))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 400, description = "Invalid event ID", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "event")?;

    let deleted = state
        .events
        .delete(id, tenant.tenant_id())
        .await
        .map_err(|err| storage_failure(err, "Failed to delete event"))?;

    if !deleted {
        return Err(ContentError::NotFound("Event").into());
    }

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
