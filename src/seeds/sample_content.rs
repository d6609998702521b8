//! Sample events and info posts for a freshly installed site.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

use crate::config::TenantConfig;
use crate::models::info::InfoType;
use crate::models::tenant;
use crate::repositories::{EventRepository, InfoRepository, NewEvent, NewInfo};
use crate::tenant::TenantId;

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tenant_created: bool,
    pub events: usize,
    pub info: usize,
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .with_context(|| format!("invalid sample date {year}-{month}-{day} {hour}:00"))
}

fn sample_events() -> Result<Vec<NewEvent>> {
    Ok(vec![
        NewEvent {
            title: "Seniorcafé".to_string(),
            description: Some(
                "Hyggeligt samvær med kaffe, kage og en god snak. Alle seniorer er velkomne."
                    .to_string(),
            ),
            start_date: utc(2025, 2, 15, 14)?,
            end_date: Some(utc(2025, 2, 15, 16)?),
            location: Some("Menighedshuset".to_string()),
            image_url: None,
            is_featured_banner: false,
        },
        NewEvent {
            title: "Ungdomsklub".to_string(),
            description: Some(
                "Fællesskab, spil og samtale for unge mellem 13 og 18 år.".to_string(),
            ),
            start_date: utc(2025, 1, 23, 19)?,
            end_date: Some(utc(2025, 1, 23, 21)?),
            location: Some("Ungdomslokalet".to_string()),
            image_url: None,
            is_featured_banner: false,
        },
        NewEvent {
            title: "Dåbsgudstjeneste".to_string(),
            description: Some(
                "Gudstjeneste med dåb. Kontakt kirkekontoret for tilmelding af dåb.".to_string(),
            ),
            start_date: utc(2025, 2, 2, 10)?,
            end_date: Some(utc(2025, 2, 2, 11)?),
            location: Some("Gislev Kirke".to_string()),
            image_url: None,
            is_featured_banner: false,
        },
        NewEvent {
            title: "Madpakkeklub".to_string(),
            description: Some(
                "Tag din madpakke med og spis sammen med andre fra sognet.".to_string(),
            ),
            start_date: utc(2025, 2, 17, 12)?,
            end_date: Some(utc(2025, 2, 17, 13)?),
            location: Some("Menighedshuset".to_string()),
            image_url: None,
            is_featured_banner: true,
        },
    ])
}

fn sample_info() -> Result<Vec<NewInfo>> {
    Ok(vec![
        NewInfo {
            title: "Kirken søger frivillige".to_string(),
            content: "Har du lyst til at give en hånd med ved arrangementer, kirkekaffe eller \
                      besøgstjeneste? Kontakt kirkekontoret."
                .to_string(),
            kind: InfoType::General,
            image_url: None,
            is_featured_banner: false,
            published_at: utc(2025, 1, 18, 10)?,
        },
        NewInfo {
            title: "Vinterlukket i kirketårnet".to_string(),
            content: "Kirketårnet er lukket for besøgende i vintermånederne og åbner igen til \
                      foråret."
                .to_string(),
            kind: InfoType::Announcement,
            image_url: None,
            is_featured_banner: false,
            published_at: utc(2025, 1, 12, 8)?,
        },
        NewInfo {
            title: "Støt kirkens sociale arbejde".to_string(),
            content: "Din gave gør en forskel for sognets sociale arbejde. Læs om mulighederne \
                      for at støtte."
                .to_string(),
            kind: InfoType::General,
            image_url: None,
            is_featured_banner: true,
            published_at: utc(2025, 1, 25, 9)?,
        },
    ])
}

/// Make sure the configured tenant row exists.
async fn ensure_tenant(db: &DatabaseConnection, config: &TenantConfig) -> Result<bool> {
    let existing = tenant::Entity::find_by_id(config.id)
        .one(db)
        .await
        .context("looking up tenant")?;
    if existing.is_some() {
        return Ok(false);
    }

    let now = Utc::now();
    tenant::ActiveModel {
        id: Set(config.id),
        name: Set(config.name.clone()),
        domain: Set(config.domain.clone()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .context("creating tenant")?;

    log::info!("Created tenant {} ({})", config.id, config.name);
    Ok(true)
}

/// Insert the sample content for `config`'s tenant.
///
/// Content is only added when the tenant has neither events nor info posts,
/// so running this twice inserts nothing the second time.
pub async fn seed_sample_content(
    db: &DatabaseConnection,
    config: &TenantConfig,
) -> Result<SeedReport> {
    let tenant_created = ensure_tenant(db, config).await?;
    let tenant = TenantId(config.id);

    let shared = Arc::new(db.clone());
    let events = EventRepository::new(Arc::clone(&shared));
    let info = InfoRepository::new(shared);

    let existing_events = events.count(tenant, None).await?;
    let existing_info = info.count(tenant, None, None).await?;
    if existing_events > 0 || existing_info > 0 {
        log::info!(
            "Tenant {} already has content ({} events, {} info), skipping sample data",
            tenant,
            existing_events,
            existing_info
        );
        return Ok(SeedReport {
            tenant_created,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport {
        tenant_created,
        ..SeedReport::default()
    };

    for event in sample_events()? {
        let title = event.title.clone();
        events
            .create(tenant, event)
            .await
            .with_context(|| format!("inserting sample event '{title}'"))?;
        report.events += 1;
    }

    for post in sample_info()? {
        let title = post.title.clone();
        info.create(tenant, post)
            .await
            .with_context(|| format!("inserting sample info '{title}'"))?;
        report.info += 1;
    }

    log::info!(
        "Seeded {} events and {} info posts for tenant {}",
        report.events,
        report.info,
        tenant
    );

    Ok(report)
}
