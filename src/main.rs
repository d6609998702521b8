//! # Church Site API Main Entry Point

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use church_api::{
    config::ConfigLoader,
    db, seeds,
    server::run_server,
    telemetry::init_tracing,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "church-api",
    version,
    about = "REST API for the church website: events, info posts and homepage banners"
)]
struct Cli {
    /// Directory holding the `.env` files (defaults to the working directory)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Do not apply database migrations on startup
    #[arg(long)]
    skip_migrations: bool,

    /// Insert the sample events and info posts if the tenant has no content
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = match cli.config_dir {
        Some(dir) => ConfigLoader::with_base_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("loading configuration")?;

    init_tracing(&config).context("initializing telemetry")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    if cli.skip_migrations {
        tracing::warn!("Skipping database migrations");
    } else {
        db::run_migrations(&db).await?;
    }

    if cli.seed || config.seed_sample_data {
        let report = seeds::seed_sample_content(&db, &config.tenant)
            .await
            .context("seeding sample content")?;
        tracing::info!(
            tenant_created = report.tenant_created,
            events = report.events,
            info = report.info,
            "Sample content seeding finished"
        );
    }

    run_server(Arc::new(config), db).await
}
