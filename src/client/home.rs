//! Headless model of the public home page.

use tracing::{instrument, warn};

use super::error::ClientResult;
use super::http::ApiClient;
use crate::models::{
    category_options, CategoryFilter, ContactRequest, NewsItem, Product, ProductFilter, Service,
    ServiceIcon,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

pub struct HomePage {
    api: ApiClient,
    services: Vec<Service>,
    products: Vec<Product>,
    news: Vec<NewsItem>,
    filter: ProductFilter,
    view_mode: ViewMode,
    contact: ContactRequest,
    submit_status: SubmitStatus,
}

impl HomePage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            services: Vec::new(),
            products: Vec::new(),
            news: Vec::new(),
            filter: ProductFilter::default(),
            view_mode: ViewMode::default(),
            contact: ContactRequest::default(),
            submit_status: SubmitStatus::default(),
        }
    }

    /// Fetch services, products and news together; nothing changes unless all three succeed
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> ClientResult<()> {
        let (services, products, news) = tokio::try_join!(
            self.api.list_services(),
            self.api.list_products(),
            self.api.list_news(),
        )
        .inspect_err(|e| warn!(error = %e, "Failed to load home page data"))?;

        self.services = services;
        self.products = products;
        self.news = news;
        Ok(())
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Each service with the glyph its icon tag maps to
    pub fn service_cards(&self) -> Vec<(&Service, ServiceIcon)> {
        self.services
            .iter()
            .map(|service| (service, service.glyph()))
            .collect()
    }

    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    pub fn products(&self) -> &[Product] {
        &self.products
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

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn contact(&self) -> &ContactRequest {
        &self.contact
    }

    pub fn edit_contact(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.contact = ContactRequest {
            name: name.into(),
            message: message.into(),
        };
        self.submit_status = SubmitStatus::Idle;
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.submit_status
    }

    /// Send the contact form; the fields are cleared only on success
    #[instrument(skip(self))]
    pub async fn submit_contact(&mut self) -> SubmitStatus {
        self.submit_status = match self.api.submit_contact(&self.contact).await {
            Ok(_) => {
                self.contact = ContactRequest::default();
                SubmitStatus::Success
            }
            Err(e) => {
                warn!(error = %e, "Contact form submission failed");
                SubmitStatus::Error
            }
        };
        self.submit_status
    }
}
