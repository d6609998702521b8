//! # Tenant Context
//!
//! Every `/api` request is scoped to a tenant resolved server-side. The
//! deployment currently serves one configured tenant through
//! [`ConstantTenantResolver`]; other resolvers plug in behind [`TenantResolver`].

use std::{fmt, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::TenantConfig;
use crate::error::ApiError;
use crate::server::AppState;

pub const TENANT_ID_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");
pub const TENANT_NAME_HEADER: HeaderName = HeaderName::from_static("x-tenant-name");

/// Tenant ID wrapper for type safety
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TenantId(pub i32);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TenantSettings {
    pub theme: String,
    pub language: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    pub domain: String,
    pub settings: TenantSettings,
}

impl Tenant {
    pub fn tenant_id(&self) -> TenantId {
        TenantId(self.id)
    }
}

impl From<&TenantConfig> for Tenant {
    fn from(config: &TenantConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            domain: config.domain.clone(),
            settings: TenantSettings {
                theme: config.theme.clone(),
                language: config.language.clone(),
                timezone: config.timezone.clone(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("tenant lookup failed: {0}")]
    Lookup(String),
}

/// Resolves the tenant a request belongs to.
pub trait TenantResolver: Send + Sync {
    fn resolve(&self, parts: &Parts) -> Result<Tenant, TenantError>;
}

/// Resolver that always yields the same tenant.
#[derive(Debug, Clone)]
pub struct ConstantTenantResolver {
    tenant: Tenant,
}

impl ConstantTenantResolver {
    pub fn new(tenant: Tenant) -> Self {
        Self { tenant }
    }

    pub fn from_config(config: &TenantConfig) -> Self {
        Self::new(Tenant::from(config))
    }

    pub fn tenant_by_id(&self, id: i32) -> Option<Tenant> {
        (self.tenant.id == id).then(|| self.tenant.clone())
    }

    /// Case-insensitive domain lookup.
    pub fn tenant_by_domain(&self, domain: &str) -> Option<Tenant> {
        self.tenant
            .domain
            .eq_ignore_ascii_case(domain.trim())
            .then(|| self.tenant.clone())
    }
}

impl TenantResolver for ConstantTenantResolver {
    fn resolve(&self, _parts: &Parts) -> Result<Tenant, TenantError> {
        Ok(self.tenant.clone())
    }
}

/// Extractor for the resolved tenant from request extensions
#[derive(Debug, Clone)]
pub struct TenantExtension(pub Tenant);

impl FromRef<AppState> for Arc<dyn TenantResolver> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.tenant_resolver)
    }
}

/// Resolves the tenant, stores it in the request extensions and tags the
/// response with `X-Tenant-ID` and `X-Tenant-Name`.
pub async fn tenant_middleware(
    State(resolver): State<Arc<dyn TenantResolver>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let tenant = resolver.resolve(&parts).map_err(|err| {
        tracing::error!(error = %err, "Tenant resolution failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TENANT_RESOLUTION_FAILED",
            "Failed to resolve tenant",
        )
    })?;

    tracing::debug!(tenant_id = tenant.id, tenant_name = %tenant.name, "Resolved tenant");

    let id_header = HeaderValue::from_str(&tenant.id.to_string()).ok();
    let name_header = HeaderValue::from_str(&tenant.name).ok();

    parts.extensions.insert(TenantExtension(tenant));
    let mut response = next.run(Request::from_parts(parts, body)).await;

    if let Some(value) = id_header {
        response.headers_mut().insert(TENANT_ID_HEADER, value);
    }
    // Names with control characters cannot travel as a header value.
    if let Some(value) = name_header {
        response.headers_mut().insert(TENANT_NAME_HEADER, value);
    }

    Ok(response)
}

impl<S> FromRequestParts<S> for TenantExtension
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantExtension>()
            .cloned()
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TENANT_RESOLUTION_FAILED",
                    "Failed to resolve tenant",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::get};
    use tower::ServiceExt;

    struct FailingResolver;

    impl TenantResolver for FailingResolver {
        fn resolve(&self, _parts: &Parts) -> Result<Tenant, TenantError> {
            Err(TenantError::Lookup("backend unavailable".to_string()))
        }
    }

    fn default_tenant() -> Tenant {
        Tenant::from(&TenantConfig::default())
    }

    async fn run_middleware(resolver: Arc<dyn TenantResolver>) -> Response {
        async fn handler(TenantExtension(tenant): TenantExtension) -> String {
            tenant.id.to_string()
        }

        Router::new()
            .route("/test", get(handler))
            .layer(axum::middleware::from_fn_with_state(
                resolver,
                tenant_middleware,
            ))
            .oneshot(
                axum::http::Request::builder()
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[test]
    fn constant_resolver_lookups() {
        let resolver = ConstantTenantResolver::new(default_tenant());

        assert_eq!(resolver.tenant_by_id(1).map(|t| t.name), Some("Gislev Kirke".into()));
        assert!(resolver.tenant_by_id(2).is_none());
        assert!(resolver.tenant_by_domain("GislevKirke.dk").is_some());
        assert!(resolver.tenant_by_domain("example.org").is_none());
    }

    #[test]
    fn tenant_settings_follow_config() {
        let tenant = default_tenant();
        assert_eq!(tenant.settings.language, "da");
        assert_eq!(tenant.settings.timezone, "Europe/Copenhagen");
        assert_eq!(tenant.settings.theme, "default");
    }

    #[tokio::test]
    async fn middleware_sets_tenant_headers() {
        let response =
            run_middleware(Arc::new(ConstantTenantResolver::new(default_tenant()))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TENANT_ID_HEADER], "1");
        assert_eq!(response.headers()[TENANT_NAME_HEADER], "Gislev Kirke");
    }

    #[tokio::test]
    async fn middleware_skips_unrepresentable_tenant_name() {
        let mut tenant = default_tenant();
        tenant.name = "Gislev\nKirke".to_string();

        let response = run_middleware(Arc::new(ConstantTenantResolver::new(tenant))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TENANT_ID_HEADER], "1");
        assert!(response.headers().get(TENANT_NAME_HEADER).is_none());
    }

    #[tokio::test]
    async fn resolution_failure_is_500() {
        let response = run_middleware(Arc::new(FailingResolver)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(TENANT_ID_HEADER).is_none());
    }
}
