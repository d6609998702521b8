//! # Server Configuration
//!
//! Router assembly, shared application state and the serve loop.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::banners::BannerService;
use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::{EventRepository, InfoRepository};
use crate::telemetry::trace_context_middleware;
use crate::tenant::{ConstantTenantResolver, TenantResolver, tenant_middleware};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub tenant_resolver: Arc<dyn TenantResolver>,
    pub banners: Arc<BannerService>,
    pub events: EventRepository,
    pub info: InfoRepository,
}

impl AppState {
    /// Wire repositories, the banner aggregator and the configured tenant.
    pub fn new(config: Arc<AppConfig>, db: DatabaseConnection) -> Self {
        let shared_db = Arc::new(db.clone());
        let events = EventRepository::new(Arc::clone(&shared_db));
        let info = InfoRepository::new(shared_db);
        let banners = BannerService::new(Arc::new(events.clone()), Arc::new(info.clone()));
        let tenant_resolver = Arc::new(ConstantTenantResolver::from_config(&config.tenant));

        Self {
            config,
            db,
            tenant_resolver,
            banners: Arc::new(banners),
            events,
            info,
        }
    }

    /// Replace the banner aggregator, e.g. with one backed by other stores.
    pub fn with_banner_service(mut self, banners: BannerService) -> Self {
        self.banners = Arc::new(banners);
        self
    }

    pub fn with_tenant_resolver(mut self, resolver: Arc<dyn TenantResolver>) -> Self {
        self.tenant_resolver = resolver;
        self
    }
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/banners", get(handlers::banners::list_banners))
        .route("/banners/{type}/{id}", get(handlers::banners::get_banner))
        .route(
            "/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/events/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/info",
            get(handlers::info::list_info).post(handlers::info::create_info),
        )
        .route(
            "/info/{id}",
            get(handlers::info::get_info)
                .put(handlers::info::update_info)
                .delete(handlers::info::delete_info),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_middleware,
        ))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    // Validated at load time; a bad value here only means no origin is allowed.
    let origin = Url::parse(&config.frontend_url)
        .ok()
        .map(|url| url.origin().ascii_serialization())
        .and_then(|origin| HeaderValue::from_str(&origin).ok());

    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => {
            tracing::warn!(frontend_url = %config.frontend_url, "Frontend URL unusable as CORS origin");
            layer
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .nest("/api", api_routes(&state))
        .route("/health", get(handlers::health))
        .fallback(handlers::route_not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server and serves until Ctrl-C.
pub async fn run_server(config: Arc<AppConfig>, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr().context("Invalid server address")?;
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::banners::list_banners,
        crate::handlers::banners::get_banner,
        crate::handlers::events::list_events,
        crate::handlers::events::get_event,
        crate::handlers::events::create_event,
        crate::handlers::events::update_event,
        crate::handlers::events::delete_event,
        crate::handlers::info::list_info,
        crate::handlers::info::get_info,
        crate::handlers::info::create_info,
        crate::handlers::info::update_info,
        crate::handlers::info::delete_info,
    ),
    components(
        schemas(
            crate::error::ApiError,
            crate::handlers::HealthResponse,
            crate::handlers::types::MessageResponse,
            crate::handlers::types::Pagination,
            crate::banners::Banner,
            crate::banners::BannerKind,
            crate::banners::BannerList,
            crate::banners::BannerMeta,
            crate::models::info::InfoType,
            crate::tenant::Tenant,
            crate::tenant::TenantSettings,
        )
    ),
    tags(
        (name = "banners", description = "Featured homepage banners"),
        (name = "events", description = "Church events"),
        (name = "info", description = "News, announcements and general posts"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Church Site API",
        description = "Events, info posts and homepage banners for the church website",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
