mod config;

use crate::config::BackfillConfig;
use anyhow::{Context, Result};
use dotenv::dotenv;
use goalfeed_core::db::{create_pool, ensure_schema, PgArticleStore};
use goalfeed_core::{BackfillJob, Catalog, TeamClassifier};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting team backfill...");

    // Config
    let config = BackfillConfig::from_env()?;
    config.log_config();

    // Catalog
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin().context("Failed to build built-in catalog")?,
    };
    info!(
        "Catalog loaded: {} leagues, {} teams, {} multi-competition teams",
        catalog.leagues().len(),
        catalog.teams().len(),
        catalog.membership().len()
    );
    let classifier = Arc::new(TeamClassifier::new(&catalog).context("Failed to compile catalog")?);

    // Database
    let pool = create_pool(&config.database_url, &config.pool).await?;
    if config.dry_run {
        warn!("Dry run: schema changes and tag writes are disabled");
    } else {
        ensure_schema(&pool).await?;
    }

    // Backfill
    let store = Arc::new(PgArticleStore::new(pool));
    let job = BackfillJob::new(classifier, store, config.options());
    let report = job.run().await?;

    info!(
        "Done. {} tagged, {} skipped (already tagged), {} without teams, {} failed, {} total in {:.1}s",
        report.tagged,
        report.skipped,
        report.untagged,
        report.failed,
        report.total,
        report.elapsed_secs()
    );
    info!("Report: {}", serde_json::to_string(&report)?);

    if report.failed > 0 {
        warn!(
            "{} article(s) failed; re-run to retry them (tagged articles are skipped)",
            report.failed
        );
    }

    Ok(())
}
