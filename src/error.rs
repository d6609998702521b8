//! # Error Handling
//!
//! This module provides unified error handling for the Church Site API.
//! Every failure leaves the service in the `{success: false, error, ...}`
//! envelope shared with successful responses, tagged with a machine-readable
//! code and the request trace ID.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::banners::BannerError;
use crate::telemetry;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Always `false` for error responses
    pub success: bool,
    /// Human-readable error message
    pub error: Box<str>,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code, code and message
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: message.into().into_boxed_str(),
            code: code.into().into_boxed_str(),
            trace_id: Self::current_trace_id(),
        }
    }

    /// Extract current trace ID from the active request (falls back to generated correlation ID)
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self)).into_response()
    }
}

/// Errors raised by the repository layer
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("validation error: {0}")]
    Validation(String),
}

impl RepositoryError {
    pub fn database_error(error: sea_orm::DbErr) -> Self {
        Self::Database(error)
    }

    pub fn validation_error<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}

/// Validation failures for the event and info content endpoints
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {0} format")]
    InvalidDate(&'static str),
    #[error("End date cannot be before start date")]
    EndBeforeStart,
    #[error("Invalid {0} ID")]
    InvalidId(&'static str),
    #[error("Limit must be between 1 and {max}")]
    InvalidLimit { max: u64 },
    #[error("Offset must be 0 or greater")]
    InvalidOffset,
    #[error("Type must be one of: news, announcement, general")]
    InvalidInfoType,
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl From<ContentError> for ApiError {
    fn from(error: ContentError) -> Self {
        let message = error.to_string();
        match error {
            ContentError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", &message),
            _ => Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message),
        }
    }
}

impl From<BannerError> for ApiError {
    fn from(error: BannerError) -> Self {
        let status = match error {
            BannerError::InvalidLimit | BannerError::InvalidId | BannerError::InvalidType => {
                StatusCode::BAD_REQUEST
            }
            BannerError::NotFoundOrNotFeatured => StatusCode::NOT_FOUND,
            BannerError::FetchFailure { ref source, .. } => {
                tracing::error!(error = %source, "Banner store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self::new(status, error.code(), &error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let status = rejection.status();
        if status.is_client_error() {
            Self::new(status, "VALIDATION_FAILED", rejection.body_text())
        } else {
            tracing::error!(error = %rejection.body_text(), "Path extraction failed");
            Self::new(status, "INTERNAL_SERVER_ERROR", "Internal server error")
        }
    }
}

/// Map a repository failure to an API error without leaking database detail.
///
/// `public_message` is what the client sees for storage-level failures.
pub fn storage_failure(error: RepositoryError, public_message: &str) -> ApiError {
    match error {
        RepositoryError::Validation(message) => {
            ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
        }
        RepositoryError::Database(db_err) => {
            tracing::error!(error = ?db_err, "{}", public_message);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                public_message,
            )
        }
    }
}

/// Create a not found error (404)
pub fn not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}
