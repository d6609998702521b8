//! Test utilities for database and router testing.
//!
//! Sets up in-memory SQLite databases with migrations applied, inserts
//! fixture rows and drives the full router with `oneshot`.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, TimeZone, Utc};
use church_api::config::AppConfig;
use church_api::models::{event, info, tenant};
use church_api::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The migrations seed tenant 1, the tenant the default config resolves to.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// UTC timestamp on the hour.
#[allow(dead_code)]
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Inserts an extra tenant row.
#[allow(dead_code)]
pub async fn insert_tenant(db: &DatabaseConnection, id: i32, domain: &str) -> Result<tenant::Model> {
    let now = Utc::now();
    let model = tenant::ActiveModel {
        id: Set(id),
        name: Set(format!("Tenant {id}")),
        domain: Set(domain.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Inserts an event row directly, bypassing the API.
#[allow(dead_code)]
pub async fn insert_event(
    db: &DatabaseConnection,
    tenant_id: i32,
    title: &str,
    start: DateTime<Utc>,
    featured: bool,
) -> Result<event::Model> {
    let now = Utc::now();
    let model = event::ActiveModel {
        tenant_id: Set(tenant_id),
        title: Set(title.to_string()),
        description: Set(Some(format!("{title} description"))),
        start_date: Set(start.into()),
        end_date: Set(None),
        location: Set(Some("Menighedshuset".to_string())),
        image_url: Set(None),
        is_featured_banner: Set(featured),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Inserts an info row directly, bypassing the API.
#[allow(dead_code)]
pub async fn insert_info(
    db: &DatabaseConnection,
    tenant_id: i32,
    title: &str,
    kind: &str,
    published: DateTime<Utc>,
    featured: bool,
) -> Result<info::Model> {
    let now = Utc::now();
    let model = info::ActiveModel {
        tenant_id: Set(tenant_id),
        title: Set(title.to_string()),
        content: Set(format!("{title} content")),
        kind: Set(kind.to_string()),
        image_url: Set(None),
        is_featured_banner: Set(featured),
        published_at: Set(published.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Full router over `db` with the default config (tenant 1).
#[allow(dead_code)]
pub fn test_app(db: &DatabaseConnection) -> Router {
    create_app(AppState::new(Arc::new(AppConfig::default()), db.clone()))
}

/// Response captured as status, headers and parsed JSON body.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

#[allow(dead_code)]
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}
