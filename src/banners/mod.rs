//! # Banner Aggregator
//!
//! Merges featured events and featured info posts of one tenant into a single
//! date-ordered feed for the homepage, and resolves individual banners by
//! their `(type, id)` key.
//!
//! Banners are computed on every call. Nothing is cached or persisted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::models::{event, info};
use crate::tenant::TenantId;

pub mod query;

pub use query::{BannerKey, BannerKind, BannerLimit, ListBannersOptions};

/// Read access to events needed by the aggregator.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events of `tenant` with the featured flag set, in any order.
    async fn find_featured_by_tenant(
        &self,
        tenant: TenantId,
    ) -> Result<Vec<event::Model>, RepositoryError>;

    async fn find_by_id(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<event::Model>, RepositoryError>;
}

/// Read access to info posts needed by the aggregator.
#[async_trait]
pub trait InfoStore: Send + Sync {
    /// All info posts of `tenant` with the featured flag set, in any order.
    async fn find_featured_by_tenant(
        &self,
        tenant: TenantId,
    ) -> Result<Vec<info::Model>, RepositoryError>;

    async fn find_by_id(
        &self,
        id: i32,
        tenant: TenantId,
    ) -> Result<Option<info::Model>, RepositoryError>;
}

/// Failures of the banner operations.
#[derive(Debug, Error)]
pub enum BannerError {
    #[error("Limit must be between 1 and 50")]
    InvalidLimit,
    #[error("Invalid banner ID")]
    InvalidId,
    #[error("Type must be either \"event\" or \"info\"")]
    InvalidType,
    #[error("Banner not found or not featured")]
    NotFoundOrNotFeatured,
    #[error("{message}")]
    FetchFailure {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl BannerError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            BannerError::InvalidLimit => "INVALID_LIMIT",
            BannerError::InvalidId => "INVALID_ID",
            BannerError::InvalidType => "INVALID_TYPE",
            BannerError::NotFoundOrNotFeatured => "BANNER_NOT_FOUND_OR_NOT_FEATURED",
            BannerError::FetchFailure { .. } => "FETCH_FAILURE",
        }
    }

    fn list_failure(source: RepositoryError) -> Self {
        counter!("banner_fetch_failures_total", "operation" => "list").increment(1);
        BannerError::FetchFailure {
            message: "Failed to fetch banners",
            source,
        }
    }

    fn get_failure(source: RepositoryError) -> Self {
        counter!("banner_fetch_failures_total", "operation" => "get").increment(1);
        BannerError::FetchFailure {
            message: "Failed to fetch banner",
            source,
        }
    }
}

/// A featured event or info post projected for the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Banner {
    pub id: i32,
    pub title: String,
    /// Event description (events only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Info body (info posts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: BannerKind,
    /// `start_date` for events, `published_at` for info posts
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Banner {
    fn sort_timestamp(&self) -> i64 {
        self.date.map(|date| date.timestamp_millis()).unwrap_or(0)
    }
}

/// Empty text is omitted from banners rather than sent as `""`.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl From<event::Model> for Banner {
    fn from(event: event::Model) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: non_blank(event.description),
            content: None,
            image_url: non_blank(event.image_url),
            kind: BannerKind::Event,
            date: Some(event.start_date.with_timezone(&Utc)),
            location: non_blank(event.location),
        }
    }
}

impl From<info::Model> for Banner {
    fn from(info: info::Model) -> Self {
        Self {
            id: info.id,
            title: info.title,
            description: None,
            content: non_blank(Some(info.content)),
            image_url: non_blank(info.image_url),
            kind: BannerKind::Info,
            date: Some(info.published_at.with_timezone(&Utc)),
            location: None,
        }
    }
}

/// Feed summary. Counts are taken before truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BannerMeta {
    /// Number of banners returned
    pub total: usize,
    pub limit: u32,
    /// Featured events available before truncation
    pub events_count: usize,
    /// Featured info posts available before truncation
    pub info_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BannerList {
    pub banners: Vec<Banner>,
    pub meta: BannerMeta,
}

/// Aggregates featured content from the injected stores.
#[derive(Clone)]
pub struct BannerService {
    events: Arc<dyn EventStore>,
    info: Arc<dyn InfoStore>,
}

impl BannerService {
    pub fn new(events: Arc<dyn EventStore>, info: Arc<dyn InfoStore>) -> Self {
        Self { events, info }
    }

    /// Build the featured feed for `tenant`, newest first.
    ///
    /// Both featured sets are fetched concurrently; either failing fails the
    /// whole call.
    pub async fn list_banners(
        &self,
        tenant: TenantId,
        options: ListBannersOptions,
    ) -> Result<BannerList, BannerError> {
        let (events, info) = tokio::try_join!(
            self.events.find_featured_by_tenant(tenant),
            self.info.find_featured_by_tenant(tenant),
        )
        .map_err(BannerError::list_failure)?;

        let events_count = events.len();
        let info_count = info.len();

        let mut banners: Vec<Banner> = events
            .into_iter()
            .map(Banner::from)
            .chain(info.into_iter().map(Banner::from))
            .collect();

        sort_banners(&mut banners);

        let limit = options.limit.get();
        banners.truncate(limit as usize);

        record_served(&banners);
        tracing::debug!(
            tenant_id = %tenant,
            limit,
            events_count,
            info_count,
            returned = banners.len(),
            "Listed banners"
        );

        Ok(BannerList {
            meta: BannerMeta {
                total: banners.len(),
                limit,
                events_count,
                info_count,
            },
            banners,
        })
    }

    /// Fetch one banner. Rows that exist but are not featured are reported
    /// exactly like rows that do not exist.
    pub async fn get_banner(&self, tenant: TenantId, key: BannerKey) -> Result<Banner, BannerError> {
        let banner = match key.kind {
            BannerKind::Event => self
                .events
                .find_by_id(key.id, tenant)
                .await
                .map_err(BannerError::get_failure)?
                .filter(|event| event.is_featured_banner)
                .map(Banner::from),
            BannerKind::Info => self
                .info
                .find_by_id(key.id, tenant)
                .await
                .map_err(BannerError::get_failure)?
                .filter(|info| info.is_featured_banner)
                .map(Banner::from),
        };

        let banner = banner.ok_or(BannerError::NotFoundOrNotFeatured)?;
        record_served(std::slice::from_ref(&banner));

        Ok(banner)
    }
}

/// Newest first. Equal dates fall back to kind (events first), then id.
pub fn sort_banners(banners: &mut [Banner]) {
    banners.sort_by(|a, b| {
        b.sort_timestamp()
            .cmp(&a.sort_timestamp())
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn record_served(banners: &[Banner]) {
    for banner in banners {
        counter!("banners_served_total", "kind" => banner.kind.as_str()).increment(1);
    }
}
