//! Request correlation IDs and the global tracing subscriber.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use log::LevelFilter;
use thiserror::Error;
use tokio::task_local;
use tracing::Instrument;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::Layer, layer::SubscriberExt};

use crate::config::AppConfig;

/// Header carrying the request correlation ID in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Trace context containing request correlation ID.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

impl TraceContext {
    /// Generate a fresh correlation ID.
    pub fn generate() -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

task_local! {
    static ACTIVE_TRACE_CONTEXT: TraceContext;
}

/// Errors that can occur while initializing global telemetry.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

static TELEMETRY_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber and bridge `log` records (sqlx, the pool) into it.
///
/// Only the first call has an effect.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if TELEMETRY_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let fmt_layer = match config.log_format.as_str() {
        "pretty" => fmt::layer().pretty().boxed(),
        _ => fmt::layer().json().boxed(),
    };

    // `try_init` would install a second `log` bridge.
    let subscriber = tracing_subscriber::registry().with(env_filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(
        level = %config.log_level,
        format = %config.log_format,
        "Telemetry initialized"
    );
    Ok(())
}

/// Execute `future` within the provided trace context, making it available through task-local
/// storage for the duration of the request.
pub async fn with_trace_context<Fut, R>(context: TraceContext, future: Fut) -> R
where
    Fut: std::future::Future<Output = R>,
{
    ACTIVE_TRACE_CONTEXT.scope(context, future).await
}

/// Get the currently active trace ID, if one has been set for the running task.
pub fn current_trace_id() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.trace_id.clone())
        .ok()
}

/// Middleware that assigns every request a correlation ID.
///
/// An incoming `x-request-id` header is reused when it is valid UTF-8, otherwise a new
/// UUID is generated. The ID is echoed back on the response.
pub async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let context = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| TraceContext {
            trace_id: value.to_string(),
        })
        .unwrap_or_else(TraceContext::generate);

    request.extensions_mut().insert(context.clone());
    let trace_id = context.trace_id.clone();

    let span = tracing::info_span!("request", trace_id = %trace_id);
    let mut response = with_trace_context(context, next.run(request))
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
