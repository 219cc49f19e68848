//! One-shot loader that replaces services, products and news with the
//! built-in reference catalog.

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};

use rural_connect::{
    app::Repositories, config::StorageBackend, init_logging, seed::SeedLoader, Config, Metrics,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Seeding failed: {:#}", e);
        eprintln!("Seeding failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_environment().context("Failed to load configuration")?;

    init_logging(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    if config.database.storage_backend == StorageBackend::Memory {
        // Nothing outlives this process with the memory back end
        anyhow::bail!("Seeding requires the dynamodb storage backend");
    }

    let metrics = Arc::new(Metrics::new()?);
    let repositories = Repositories::dynamodb(&config.database, metrics).await;

    info!(
        products = %config.database.products_table_name,
        services = %config.database.services_table_name,
        news = %config.database.news_table_name,
        "Connected, seeding catalog"
    );

    let report = SeedLoader::new(repositories.catalog)
        .run()
        .await
        .context("Failed to seed catalog")?;

    info!(
        services = report.services,
        products = report.products,
        news = report.news,
        "Data seeded successfully"
    );
    Ok(())
}
