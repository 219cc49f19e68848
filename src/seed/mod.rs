//! Replaces the catalog with the built-in reference data.
//!
//! Each collection is cleared and rewritten in turn: services, then products,
//! then news. A failure part way through leaves the earlier collections
//! already replaced.

pub mod data;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::RepositoryResult;
use crate::repositories::CatalogRepository;

/// Counts written by a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub services: usize,
    pub products: usize,
    pub news: usize,
}

pub struct SeedLoader {
    catalog: Arc<dyn CatalogRepository>,
}

impl SeedLoader {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    #[instrument(name = "seed_catalog", skip(self))]
    pub async fn run(&self) -> RepositoryResult<SeedReport> {
        info!("Seeding catalog");

        let services = self
            .catalog
            .replace_services(data::services())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to seed services"))?;
        info!(count = services, "Services seeded");

        let products = self
            .catalog
            .replace_products(data::products())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to seed products"))?;
        info!(count = products, "Products seeded");

        let news = self
            .catalog
            .replace_news(data::news())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to seed news"))?;
        info!(count = news, "News seeded");

        Ok(SeedReport {
            services,
            products,
            news,
        })
    }
}
