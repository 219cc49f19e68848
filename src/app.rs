use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::config::{DatabaseConfig, ServerConfig, StorageBackend};
use crate::handlers::{
    admin, api, health_check, metrics_handler, request_validation_middleware,
    security_headers_middleware,
};
use crate::observability::{observability_middleware, BusinessTracingMiddleware, Metrics};
use crate::repositories::{
    AccountRepository, BookingRepository, CatalogRepository, CatalogTables,
    DynamoDbAccountRepository, DynamoDbBookingRepository, DynamoDbCatalogRepository,
    InMemoryAccountRepository, InMemoryBookingRepository, InMemoryCatalogRepository,
};
use crate::seed::SeedLoader;
use crate::services::{AccountService, BookingService, CatalogService};

/// How long a browser may cache a preflight answer
const CORS_MAX_AGE: Duration = Duration::from_secs(86400);

/// The three stores behind the API, whichever back end holds them
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalogRepository::new()),
            bookings: Arc::new(InMemoryBookingRepository::new()),
            accounts: Arc::new(InMemoryAccountRepository::new()),
        }
    }

    /// DynamoDB-backed repositories; every table call is recorded in `metrics`
    pub async fn dynamodb(config: &DatabaseConfig, metrics: Arc<Metrics>) -> Self {
        let client = Arc::new(config.dynamodb_client().await);
        let tables = CatalogTables {
            products: config.products_table_name.clone(),
            services: config.services_table_name.clone(),
            news: config.news_table_name.clone(),
        };

        Self {
            catalog: Arc::new(
                DynamoDbCatalogRepository::new(client.clone(), tables, config.region.clone())
                    .with_metrics(metrics.clone()),
            ),
            bookings: Arc::new(
                DynamoDbBookingRepository::new(
                    client.clone(),
                    config.bookings_table_name.clone(),
                    config.region.clone(),
                )
                .with_metrics(metrics.clone()),
            ),
            accounts: Arc::new(
                DynamoDbAccountRepository::new(
                    client,
                    config.contacts_table_name.clone(),
                    config.profiles_table_name.clone(),
                    config.region.clone(),
                )
                .with_metrics(metrics),
            ),
        }
    }

    pub async fn from_config(config: &DatabaseConfig, metrics: Arc<Metrics>) -> Self {
        info!(backend = %config.storage_backend, "Initializing repositories");
        match config.storage_backend {
            StorageBackend::DynamoDb => Self::dynamodb(config, metrics).await,
            StorageBackend::Memory => Self::in_memory(),
        }
    }
}

/// Build the application router over the given repositories
pub fn create_app(metrics: Arc<Metrics>, repositories: Repositories, server: &ServerConfig) -> Router {
    let metrics_for_middleware = metrics.clone();
    let max_request_size = server.max_request_size;
    let business = BusinessTracingMiddleware::new(metrics.clone());

    let api_state = api::ApiState {
        catalog_service: Arc::new(CatalogService::new(repositories.catalog.clone())),
        booking_service: Arc::new(BookingService::new(
            repositories.bookings,
            repositories.catalog.clone(),
        )),
        account_service: Arc::new(AccountService::new(repositories.accounts)),
        business: business.clone(),
    };

    let mut router: Router = Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .route("/api/products", get(api::list_products))
        .route("/api/services", get(api::list_services))
        .route("/api/news", get(api::list_news))
        .route(
            "/api/bookings",
            get(api::list_bookings).post(api::create_booking),
        )
        .route("/api/auth/profile", put(api::update_profile))
        .route("/api/contact", post(api::submit_contact))
        .with_state(api_state);

    match &server.admin_token {
        Some(admin_token) => {
            let admin_state = admin::AdminState {
                seed_loader: Arc::new(SeedLoader::new(repositories.catalog)),
                business,
                admin_token: Arc::from(admin_token.as_str()),
            };
            router = router.merge(
                Router::new()
                    .route("/api/admin/seed", post(admin::seed_database))
                    .with_state(admin_state),
            );
        }
        None => info!("No admin token configured; admin routes are disabled"),
    }

    // Inner to outer: the CORS layer sees every rejection made below it
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::from_fn(move |req, next| {
            request_validation_middleware(max_request_size, req, next)
        }))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer())
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}

/// Any origin may call the API; answers preflight requests itself
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    const ADMIN_TOKEN: &str = "test-admin";

    fn app_with(server: ServerConfig) -> Router {
        create_app(
            Arc::new(Metrics::new().unwrap()),
            Repositories::in_memory(),
            &server,
        )
    }

    fn app() -> Router {
        app_with(ServerConfig {
            admin_token: Some(ADMIN_TOKEN.to_string()),
            ..ServerConfig::default()
        })
    }

    fn seed_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/api/admin/seed");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_empty_arrays() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_bookings_require_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/bookings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "No token provided");
    }

    #[tokio::test]
    async fn test_contact_validation() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"","message":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_seed_then_list_services() {
        let app = app();

        let response = app
            .clone()
            .oneshot(seed_request(Some(ADMIN_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/services")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let services = json_body(response).await;
        assert_eq!(services.as_array().unwrap().len(), 6);
        assert_eq!(services[0]["name"], "Home Delivery");
    }

    #[tokio::test]
    async fn test_seed_requires_admin_token() {
        let app = app();

        let response = app.clone().oneshot(seed_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(seed_request(Some("customer-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(Request::builder().uri("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_seed_route_absent_without_admin_token() {
        let response = app_with(ServerConfig::default())
            .oneshot(seed_request(Some(ADMIN_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight_for_authenticated_booking() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/bookings")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(
                        header::ACCESS_CONTROL_REQUEST_HEADERS,
                        "authorization,content-type",
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST"));
        assert!(headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("authorization"));
        assert_eq!(headers["access-control-max-age"], "86400");
    }

    #[tokio::test]
    async fn test_rejected_request_still_carries_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/contact")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .header(header::CONTENT_LENGTH, 5)
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }
}
