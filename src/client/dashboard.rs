//! Headless model of the signed-in dashboard.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::cart::CartManager;
use super::checkout::{submit_order, ORDER_FAILED_NOTICE};
use super::error::{ClientError, ClientResult, StorageResult};
use super::http::ApiClient;
use super::session::Session;
use super::storage::KeyValueStore;
use crate::models::{
    category_options, Booking, CategoryFilter, Product, ProductFilter, Profile,
    ProfileUpdateRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Overview,
    Products,
    Cart,
    Bookings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStats {
    pub cart_lines: usize,
    pub booking_count: usize,
    pub cart_value: u64,
}

pub struct Dashboard {
    api: ApiClient,
    cart: CartManager,
    products: Vec<Product>,
    bookings: Vec<Booking>,
    tab: DashboardTab,
    filter: ProductFilter,
    profile_form: ProfileUpdateRequest,
    notice: Option<String>,
}

impl Dashboard {
    pub fn new(api: ApiClient, cart: CartManager) -> Self {
        Self {
            api,
            cart,
            products: Vec::new(),
            bookings: Vec::new(),
            tab: DashboardTab::default(),
            filter: ProductFilter::default(),
            profile_form: ProfileUpdateRequest::default(),
            notice: None,
        }
    }

    /// Dashboard whose cart and bearer token both live in `store`
    pub fn from_store(api: ApiClient, store: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let cart = CartManager::load(store.clone())?;
        Ok(Self::new(api.with_session(Session::new(store)), cart))
    }

    /// Load products and bookings, as on first mount.
    ///
    /// The two fetches are independent: each failure is logged and the other
    /// list still updates. The first error is returned.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let (products, bookings) =
            tokio::join!(self.api.list_products(), self.api.list_bookings());
        let mut first_error = None;

        match products {
            Ok(products) => self.products = products,
            Err(e) => {
                warn!(error = %e, "Failed to fetch products");
                first_error.get_or_insert(e);
            }
        }

        match bookings {
            Ok(bookings) => self.bookings = bookings,
            Err(e) => {
                warn!(error = %e, "Failed to fetch bookings");
                first_error.get_or_insert(e);
            }
        }

        debug!(
            products = self.products.len(),
            bookings = self.bookings.len(),
            "Dashboard refreshed"
        );
        first_error.map_or(Ok(()), Err)
    }

    #[instrument(skip(self))]
    pub async fn refresh_products(&mut self) -> ClientResult<()> {
        self.products = self.api.list_products().await?;
        debug!(count = self.products.len(), "Products refreshed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn refresh_bookings(&mut self) -> ClientResult<()> {
        self.bookings = self.api.list_bookings().await?;
        debug!(count = self.bookings.len(), "Bookings refreshed");
        Ok(())
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn filtered_products(&self) -> Vec<&Product> {
        self.filter.apply(&self.products)
    }

    pub fn category_options(&self) -> Vec<CategoryFilter> {
        category_options(&self.products)
    }

    pub fn quick_stats(&self) -> QuickStats {
        QuickStats {
            cart_lines: self.cart.line_count(),
            booking_count: self.bookings.len(),
            cart_value: self.cart.total(),
        }
    }

    /// Add one unit of a listed product
    pub fn add_to_cart(&mut self, product_id: &str) -> ClientResult<()> {
        let product = self
            .products
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Product {}", product_id)))?;

        self.cart.add(product)?;
        Ok(())
    }

    pub fn set_cart_quantity(&mut self, product_id: &str, quantity: i64) -> ClientResult<()> {
        Ok(self.cart.set_quantity(product_id, quantity)?)
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> ClientResult<()> {
        Ok(self.cart.remove(product_id)?)
    }

    /// Place the cart as an order and show it under the bookings tab.
    ///
    /// A failure leaves the cart intact and raises [`ORDER_FAILED_NOTICE`].
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> ClientResult<Booking> {
        self.notice = None;

        let booking = match submit_order(&self.api, &mut self.cart).await {
            Ok(booking) => booking,
            Err(e) => {
                self.notice = Some(ORDER_FAILED_NOTICE.to_string());
                return Err(e);
            }
        };

        if let Err(e) = self.refresh_bookings().await {
            // The order exists; show it locally until the next refresh succeeds
            warn!(error = %e, "Failed to refresh bookings after order");
            self.bookings.insert(0, booking.clone());
        }

        self.tab = DashboardTab::Bookings;
        Ok(booking)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn profile_form(&self) -> &ProfileUpdateRequest {
        &self.profile_form
    }

    pub fn edit_profile(&mut self, name: impl Into<String>, phone: impl Into<String>) {
        self.profile_form = ProfileUpdateRequest {
            name: name.into(),
            phone: phone.into(),
        };
    }

    #[instrument(skip(self))]
    pub async fn save_profile(&mut self) -> ClientResult<Profile> {
        match self.api.update_profile(&self.profile_form).await {
            Ok(profile) => {
                self.notice = None;
                Ok(profile)
            }
            Err(e) => {
                self.notice = Some("Failed to update profile. Please try again.".to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStore;
    use crate::models::Category;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Basmati Rice", "Rice", 450, Category::Groceries, 100, None),
            Product::new(
                "Paracetamol Tablets",
                "Fever",
                25,
                Category::Medicines,
                300,
                None,
            ),
            Product::new("Jaggery", "Sweet", 85, Category::Groceries, 200, None),
        ]
    }

    async fn server_with(products: &[Product], bookings: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bookings))
            .mount(&server)
            .await;
        server
    }

    fn dashboard_for(server: &MockServer) -> Dashboard {
        let api = ApiClient::new(server.uri()).unwrap().with_token("t");
        let cart = CartManager::load(Arc::new(MemoryStore::new())).unwrap();
        Dashboard::new(api, cart)
    }

    #[tokio::test]
    async fn test_refresh_and_filters() {
        let products = catalog();
        let server = server_with(&products, json!({ "bookings": [] })).await;
        let mut dashboard = dashboard_for(&server);

        dashboard.refresh().await.unwrap();
        assert_eq!(dashboard.filtered_products().len(), 3);
        assert_eq!(
            dashboard.category_options(),
            vec![
                CategoryFilter::All,
                CategoryFilter::Only(Category::Groceries),
                CategoryFilter::Only(Category::Medicines),
            ]
        );

        dashboard.select_category(CategoryFilter::Only(Category::Groceries));
        dashboard.set_search("JAG");
        let filtered = dashboard.filtered_products();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Jaggery");
    }

    #[tokio::test]
    async fn test_quick_stats_follow_cart() {
        let products = catalog();
        let server = server_with(&products, json!([])).await;
        let mut dashboard = dashboard_for(&server);
        dashboard.refresh().await.unwrap();

        dashboard.add_to_cart(&products[0].id).unwrap();
        dashboard.add_to_cart(&products[1].id).unwrap();
        dashboard.set_cart_quantity(&products[1].id, 4).unwrap();

        assert_eq!(
            dashboard.quick_stats(),
            QuickStats {
                cart_lines: 2,
                booking_count: 0,
                cart_value: 450 + 100,
            }
        );

        assert!(matches!(
            dashboard.add_to_cart("missing"),
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_order_raises_notice() {
        let products = catalog();
        let server = server_with(&products, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        dashboard.refresh().await.unwrap();
        dashboard.set_tab(DashboardTab::Cart);
        dashboard.add_to_cart(&products[0].id).unwrap();

        assert!(dashboard.place_order().await.is_err());
        assert_eq!(dashboard.notice(), Some(ORDER_FAILED_NOTICE));
        assert_eq!(dashboard.tab(), DashboardTab::Cart);
        assert_eq!(dashboard.cart().line_count(), 1);
    }

    #[tokio::test]
    async fn test_profile_form_kept_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Name required" })))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        dashboard.edit_profile("", "98450 12345");

        let result = dashboard.save_profile().await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(dashboard.profile_form().phone, "98450 12345");
        assert!(dashboard.notice().is_some());
    }

    #[tokio::test]
    async fn test_refresh_loads_bookings_when_products_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bookings": [{
                    "_id": "65a1f0c2b7e4d9a3c1f2e8ab",
                    "items": [{ "product": catalog()[0], "quantity": 1, "price": 450 }],
                    "totalAmount": 450,
                    "status": "pending",
                    "createdAt": "2024-12-15T10:00:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        let result = dashboard.refresh().await;

        assert!(matches!(result, Err(ClientError::Server { status: 503, .. })));
        assert!(dashboard.products().is_empty());
        assert_eq!(dashboard.bookings().len(), 1);
        assert_eq!(dashboard.quick_stats().booking_count, 1);
    }

    #[tokio::test]
    async fn test_sign_in_through_store_reaches_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .and(header("authorization", "Bearer stored-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "No token provided" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut dashboard =
            Dashboard::from_store(ApiClient::new(server.uri()).unwrap(), store.clone()).unwrap();

        assert!(matches!(
            dashboard.refresh_bookings().await,
            Err(ClientError::Unauthorized(_))
        ));

        Session::new(store).set_token("stored-token").unwrap();
        dashboard.refresh_bookings().await.unwrap();
        assert!(dashboard.bookings().is_empty());
    }
}
