//! # Info API Handlers
//!
//! CRUD endpoints for tenant-scoped news, announcements and general posts.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ContentError, storage_failure};
use crate::handlers::types::{
    ApiResponse, MessageResponse, PageParams, Pagination, deserialize_nullable, nullable_text,
    optional_instant, optional_text, parse_featured, parse_id, required_text,
};
use crate::models::info::{self, InfoType};
use crate::repositories::{InfoChanges, InfoFilter, NewInfo};
use crate::server::AppState;
use crate::tenant::TenantExtension;

/// Query parameters for listing info posts
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListInfoQuery {
    /// `true` or `false` to filter on the featured flag
    pub featured: Option<String>,
    /// `news`, `announcement` or `general`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoList {
    pub info: Vec<info::Model>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoData {
    pub info: info::Model,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInfoRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Defaults to `general`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image_url: Option<String>,
    pub is_featured_banner: Option<bool>,
    /// Defaults to the time of the request
    pub published_at: Option<String>,
}

/// Body for a partial info update. `null` clears `image_url`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInfoRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub image_url: Option<Option<String>>,
    pub is_featured_banner: Option<bool>,
    pub published_at: Option<String>,
}

fn parse_info_type(raw: Option<String>) -> Result<Option<InfoType>, ContentError> {
    optional_text(raw)
        .map(|raw| raw.parse::<InfoType>().map_err(|_| ContentError::InvalidInfoType))
        .transpose()
}

impl CreateInfoRequest {
    fn into_new_info(self) -> Result<NewInfo, ContentError> {
        let title = required_text(self.title, "title")?;
        let content = required_text(self.content, "content")?;
        let kind = parse_info_type(self.kind)?.unwrap_or_default();
        let published_at =
            optional_instant(self.published_at.as_deref(), "published_at")?.unwrap_or_else(Utc::now);

        Ok(NewInfo {
            title,
            content,
            kind,
            image_url: optional_text(self.image_url),
            is_featured_banner: self.is_featured_banner.unwrap_or(false),
            published_at,
        })
    }
}

impl UpdateInfoRequest {
    fn into_changes(self) -> Result<InfoChanges, ContentError> {
        Ok(InfoChanges {
            title: optional_text(self.title),
            content: optional_text(self.content),
            kind: parse_info_type(self.kind)?,
            image_url: nullable_text(self.image_url),
            is_featured_banner: self.is_featured_banner,
            published_at: optional_instant(self.published_at.as_deref(), "published_at")?,
        })
    }
}

/// List info posts, most recently published first
#[utoipa::path(
    get,
    path = "/api/info",
    params(ListInfoQuery),
    responses(
        (status = 200, description = "Info posts", body = ApiResponse<InfoList>),
        (status = 400, description = "Invalid filter or page", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "info"
)]
pub async fn list_info(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    query: Result<Query<ListInfoQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<InfoList>>, ApiError> {
    let Query(query) = query?;
    let page = PageParams::parse(query.limit.as_deref(), query.offset.as_deref())?;
    let featured = parse_featured(query.featured.as_deref());
    let kind = parse_info_type(query.kind)?;
    let tenant_id = tenant.tenant_id();

    let filter = InfoFilter {
        featured,
        kind,
        page: page.page(),
    };
    let (info, total) = tokio::try_join!(
        state.info.list(tenant_id, filter),
        state.info.count(tenant_id, featured, kind),
    )
    .map_err(|err| storage_failure(err, "Failed to fetch info"))?;

    Ok(Json(ApiResponse::ok(InfoList {
        info,
        pagination: page.pagination(total),
    })))
}

/// Fetch a single info post
#[utoipa::path(
    get,
    path = "/api/info/{id}",
    params(("id" = i32, Path, description = "Info id")),
    responses(
        (status = 200, description = "Info post", body = ApiResponse<InfoData>),
        (status = 400, description = "Invalid info ID", body = ApiError),
        (status = 404, description = "Info not found", body = ApiError)
    ),
    tag = "info"
)]
pub async fn get_info(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<InfoData>>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "info")?;

    let info = state
        .info
        .get(id, tenant.tenant_id())
        .await
        .map_err(|err| storage_failure(err, "Failed to fetch info"))?
        .ok_or(ContentError::NotFound("Info"))?;

    Ok(Json(ApiResponse::ok(InfoData { info })))
}

/// Create an info post
#[utoipa::path(
    post,
    path = "/api/info",
    request_body = CreateInfoRequest,
    responses(
        (status = 201, description = "Info created", body = ApiResponse<InfoData>),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "info"
)]
pub async fn create_info(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateInfoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<InfoData>>), ApiError> {
    let Json(payload) = payload?;
    let new_info = payload.into_new_info()?;

    let info = state
        .info
        .create(tenant.tenant_id(), new_info)
        .await
        .map_err(|err| storage_failure(err, "Failed to create info"))?;

    tracing::info!(tenant_id = tenant.id, info_id = info.id, "Info created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            InfoData { info },
            "Info created successfully",
        )),
    ))
}

/// Partially update an info post
#[utoipa::path(
    put,
    path = "/api/info/{id}",
    params(("id" = i32, Path, description = "Info id")),
    request_body = UpdateInfoRequest,
    responses(
        (status = 200, description = "Info updated", body = ApiResponse<InfoData>),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Info not found", body = ApiError)
    ),
    tag = "info"
)]
pub async fn update_info(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateInfoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<InfoData>>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "info")?;
    let Json(payload) = payload?;
    let changes = payload.into_changes()?;

    let info = state
        .info
        .update(id, tenant.tenant_id(), changes)
        .await
        .map_err(|err| storage_failure(err, "Failed to update info"))?
        .ok_or(ContentError::NotFound("Info"))?;

    Ok(Json(ApiResponse::with_message(
        InfoData { info },
        "Info updated successfully",
    )))
}

/// Delete an info post
#[utoipa::path(
    delete,
    path = "/api/info/{id}",
    params(("id" = i32, Path, description = "Info id")),
    responses(
        (status = 200, description = "Info deleted", body = MessageResponse),
        (status = 400, description = "Invalid info ID", body = ApiError),
        (status = 404, description = "Info not found", body = ApiError)
    ),
    tag = "info"
)]
pub async fn delete_info(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let id = parse_id(&id, "info")?;

    let deleted = state
        .info
        .delete(id, tenant.tenant_id())
        .await
        .map_err(|err| storage_failure(err, "Failed to delete info"))?;

    if !deleted {
        return Err(ContentError::NotFound("Info").into());
    }

    Ok(Json(MessageResponse::new("Info deleted successfully")))
}
