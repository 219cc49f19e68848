use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::auth::BearerToken;
use crate::observability::BusinessTracingMiddleware;
use crate::seed::{SeedLoader, SeedReport};

/// Admin state containing the seed loader and the credential that unlocks it
#[derive(Clone)]
pub struct AdminState {
    pub seed_loader: Arc<SeedLoader>,
    pub business: BusinessTracingMiddleware,
    pub admin_token: Arc<str>,
}

/// Response for seeding operations
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: SeedReport,
    pub timestamp: String,
}

/// Replace services, products and news with the built-in catalog
#[instrument(name = "seed_database", skip(state, token))]
pub async fn seed_database(
    State(state): State<AdminState>,
    token: BearerToken,
) -> Result<Json<SeedResponse>, (StatusCode, Json<Value>)> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    if token.as_str() != &*state.admin_token {
        warn!("Seed request rejected: wrong admin token");
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Admin token required",
                "timestamp": timestamp,
            })),
        ));
    }

    info!("Seeding database with the reference catalog");

    match state.business.trace_seed_run(state.seed_loader.run()).await {
        Ok(report) => {
            info!(
                services = report.services,
                products = report.products,
                news = report.news,
                "Database seeded"
            );
            Ok(Json(SeedResponse {
                message: format!(
                    "Database seeded with {} services, {} products and {} news items",
                    report.services, report.products, report.news
                ),
                report,
                timestamp,
            }))
        }
        Err(err) => {
            error!("Failed to seed database: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to seed database",
                    "message": err.to_string(),
                    "timestamp": timestamp,
                })),
            ))
        }
    }
}
