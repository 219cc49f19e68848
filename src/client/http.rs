use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::{ClientError, ClientResult};
use super::session::Session;
use crate::config::ClientConfig;
use crate::models::{
    Booking, ContactRequest, ContactResponse, CreateBookingRequest, NewsItem, Product, Profile,
    ProfileUpdateRequest, Service,
};
use crate::seed::SeedReport;

/// `GET /api/bookings` has answered both with a bare array and with an envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum BookingsBody {
    Envelope { bookings: Vec<Booking> },
    List(Vec<Booking>),
}

impl From<BookingsBody> for Vec<Booking> {
    fn from(body: BookingsBody) -> Self {
        match body {
            BookingsBody::Envelope { bookings } => bookings,
            BookingsBody::List(bookings) => bookings,
        }
    }
}

/// Where the bearer credential for authenticated calls comes from
#[derive(Debug, Clone, Default)]
enum Credential {
    #[default]
    Anonymous,
    Fixed(String),
    /// Read from the local store on every request
    Stored(Session),
}

/// Typed client for the Rural Connect REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::from_config(&ClientConfig {
            api_base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credential: Credential::Anonymous,
        })
    }

    /// Send a fixed bearer token with every call
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Credential::Fixed(token.into());
        self
    }

    /// Read the bearer token from `session` at the moment each call is made,
    /// so a sign-in or sign-out written to the store applies to the next request
    pub fn with_session(mut self, session: Session) -> Self {
        self.credential = Credential::Stored(session);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.credential = token.map_or(Credential::Anonymous, Credential::Fixed);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer_token(&self) -> ClientResult<Option<String>> {
        Ok(match &self.credential {
            Credential::Anonymous => None,
            Credential::Fixed(token) => Some(token.clone()),
            Credential::Stored(session) => session.token()?,
        })
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        Ok(match self.bearer_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = error_message(response).await;
        debug!(status = status.as_u16(), message = %message, "API call failed");
        Err(status_error(status, message))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path)?.json(body)).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/products").await
    }

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> ClientResult<Vec<Service>> {
        self.get("/api/services").await
    }

    #[instrument(skip(self))]
    pub async fn list_news(&self) -> ClientResult<Vec<NewsItem>> {
        self.get("/api/news").await
    }

    #[instrument(skip(self))]
    pub async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        let body: BookingsBody = self.get("/api/bookings").await?;
        Ok(body.into())
    }

    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<Booking> {
        self.send_json(Method::POST, "/api/bookings", request).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: &ProfileUpdateRequest) -> ClientResult<Profile> {
        self.send_json(Method::PUT, "/api/auth/profile", request)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn submit_contact(&self, request: &ContactRequest) -> ClientResult<ContactResponse> {
        self.send_json(Method::POST, "/api/contact", request).await
    }

    /// Trigger a server-side reseed of the catalog
    #[instrument(skip(self))]
    pub async fn seed(&self) -> ClientResult<SeedReport> {
        self.send(self.request(Method::POST, "/api/admin/seed")?)
            .await
    }
}

/// Prefer the `error` field of a JSON body, then the raw text
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) => serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text
                }
            }),
        Err(e) => {
            warn!("Failed to read error body: {}", e);
            status.to_string()
        }
    }
}

fn status_error(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(message)
        }
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::{KeyValueStore, MemoryStore};
    use crate::models::{BookingLine, Category};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn product_json() -> serde_json::Value {
        json!({
            "_id": "65a1f0c2b7e4d9a3c1f2e801",
            "name": "Solar LED Lantern",
            "description": "Portable lantern",
            "price": 450,
            "category": "electronics",
            "inStock": true,
            "stockQuantity": 30
        })
    }

    fn booking_json() -> serde_json::Value {
        json!({
            "_id": "65a1f0c2b7e4d9a3c1f2e8ab",
            "items": [{ "product": product_json(), "quantity": 1, "price": 450 }],
            "totalAmount": 450,
            "status": "pending",
            "createdAt": "2024-12-15T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json()])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let products = client.list_products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].category, Category::Electronics);
        assert_eq!(products[0].stock_quantity, 30);
    }

    #[tokio::test]
    async fn test_bookings_accept_array_and_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .and(header("authorization", "Bearer array-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([booking_json()])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .and(header("authorization", "Bearer envelope-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "bookings": [booking_json()] })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();

        let from_array = client
            .clone()
            .with_token("array-token")
            .list_bookings()
            .await
            .unwrap();
        let from_envelope = client
            .with_token("envelope-token")
            .list_bookings()
            .await
            .unwrap();

        assert_eq!(from_array, from_envelope);
        assert_eq!(from_array[0].reference(), "C1F2E8AB");
    }

    #[tokio::test]
    async fn test_create_booking_sends_ids_and_quantities() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .and(body_json(json!({
                "items": [{ "product": "65a1f0c2b7e4d9a3c1f2e801", "quantity": 1 }],
                "totalAmount": 450
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(booking_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap().with_token("t");
        let booking = client
            .create_booking(&CreateBookingRequest {
                items: vec![BookingLine {
                    product: "65a1f0c2b7e4d9a3c1f2e801".to_string(),
                    quantity: 1,
                }],
                total_amount: 450,
            })
            .await
            .unwrap();

        assert_eq!(booking.total_amount, 450);
    }

    #[tokio::test]
    async fn test_error_statuses_are_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "No token provided" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(409).set_body_string("sold out"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();

        match client.list_bookings().await {
            Err(ClientError::Unauthorized(message)) => assert_eq!(message, "No token provided"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }

        let request = CreateBookingRequest {
            items: vec![],
            total_amount: 0,
        };
        match client.create_booking(&request).await {
            Err(ClientError::Conflict(message)) => assert_eq!(message, "sold out"),
            other => panic!("Expected Conflict, got {:?}", other),
        }

        assert!(matches!(
            client.list_news().await,
            Err(ClientError::Server { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri())).unwrap();
        assert!(matches!(
            client.list_services().await,
            Err(ClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_stored_token_read_per_request() {
        let server = MockServer::start().await;
        for token in ["first-token", "second-token"] {
            Mock::given(method("GET"))
                .and(path("/api/bookings"))
                .and(header("authorization", format!("Bearer {}", token).as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        let client = ApiClient::new(server.uri())
            .unwrap()
            .with_session(session.clone());

        session.set_token("first-token").unwrap();
        client.list_bookings().await.unwrap();

        store.set(crate::client::storage::TOKEN_KEY, "second-token").unwrap();
        client.list_bookings().await.unwrap();

        // Signed out: no header, so neither mock matches
        session.sign_out().unwrap();
        assert!(matches!(
            client.list_bookings().await,
            Err(ClientError::NotFound(_))
        ));
    }
}
