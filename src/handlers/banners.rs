//! # Banners API Handlers
//!
//! Homepage banner feed built from featured events and info posts.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::banners::{Banner, BannerKey, BannerList, ListBannersOptions};
use crate::error::ApiError;
use crate::handlers::types::ApiResponse;
use crate::server::AppState;
use crate::tenant::TenantExtension;

/// Query parameters for the banner feed
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBannersQuery {
    /// Maximum number of banners to return (default: 10, range: 1-50)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BannerData {
    pub banner: Banner,
}

/// List the featured banners of the current tenant, newest first
#[utoipa::path(
    get,
    path = "/api/banners",
    params(ListBannersQuery),
    responses(
        (status = 200, description = "Featured banners", body = ApiResponse<BannerList>),
        (status = 400, description = "Limit out of range", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError)
    ),
    tag = "banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    query: Result<Query<ListBannersQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<BannerList>>, ApiError> {
    let Query(query) = query?;
    let options = ListBannersOptions::parse(query.limit.as_deref())?;

    let list = state
        .banners
        .list_banners(tenant.tenant_id(), options)
        .await?;

    Ok(Json(ApiResponse::ok(list)))
}

/// Fetch one featured banner by type and id
#[utoipa::path(
    get,
    path = "/api/banners/{type}/{id}",
    params(
        ("type" = String, Path, description = "Banner type: `event` or `info`"),
        ("id" = i32, Path, description = "Id of the underlying event or info post")
    ),
    responses(
        (status = 200, description = "Banner found", body = ApiResponse<BannerData>),
        (status = 400, description = "Invalid type or id", body = ApiError),
        (status = 404, description = "Banner not found or not featured", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError)
    ),
    tag = "banners"
)]
pub async fn get_banner(
    State(state): State<AppState>,
    TenantExtension(tenant): TenantExtension,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<ApiResponse<BannerData>>, ApiError> {
    let Path((kind, id)) = path?;
    let key = BannerKey::parse(&kind, &id)?;

    let banner = state.banners.get_banner(tenant.tenant_id(), key).await?;

    Ok(Json(ApiResponse::ok(BannerData { banner })))
}
