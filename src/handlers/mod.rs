//! # API Handlers
//!
//! HTTP endpoint handlers for the Church Site API.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, not_found};
use crate::server::AppState;

pub mod banners;
pub mod events;
pub mod info;
pub mod types;

/// Liveness and database reachability
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `OK` or `ERROR`
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    /// `connected` or `disconnected`
    pub database: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match crate::db::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                timestamp: Utc::now(),
                database: "connected".to_string(),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "ERROR".to_string(),
                    timestamp: Utc::now(),
                    database: "disconnected".to_string(),
                }),
            )
        }
    }
}

/// Fallback for unmatched routes
pub async fn route_not_found() -> ApiError {
    not_found("Route not found")
}
