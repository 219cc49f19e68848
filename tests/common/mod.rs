use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::net::TcpListener;

use rural_connect::app::{create_app, Repositories};
use rural_connect::client::{ApiClient, CartManager, MemoryStore};
use rural_connect::config::ServerConfig;
use rural_connect::Metrics;

/// Bearer token that unlocks the admin routes in tests
pub const ADMIN_TOKEN: &str = "integration-admin";

/// The real router over in-memory repositories, served on an ephemeral port
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let app = create_app(
            metrics,
            Repositories::in_memory(),
            &ServerConfig {
                admin_token: Some(ADMIN_TOKEN.to_string()),
                ..ServerConfig::default()
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub async fn seed_test_data(&self) {
        let response = self
            .client
            .post(format!("{}/api/admin/seed", self.base_url))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await
            .expect("Failed to seed test data");

        assert_eq!(response.status().as_u16(), 200);
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url).expect("Failed to build API client")
    }

    pub fn api_as(&self, token: &str) -> ApiClient {
        self.api().with_token(token)
    }

    pub fn empty_cart(&self) -> CartManager {
        CartManager::load(Arc::new(MemoryStore::new())).expect("Failed to load cart")
    }
}
