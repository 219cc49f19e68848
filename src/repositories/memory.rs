//! In-process repositories for local runs and end-to-end tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::booking_repository::newest_first;
use super::{AccountRepository, BookingRepository, CatalogRepository};
use crate::models::{Booking, ContactMessage, NewsItem, Product, Profile, RepositoryResult, Service};

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    services: Vec<Service>,
    news: Vec<NewsItem>,
}

/// Catalog held in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.state.read().await.products.clone())
    }

    async fn find_product(&self, id: &str) -> RepositoryResult<Option<Product>> {
        Ok(self
            .state
            .read()
            .await
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    async fn list_services(&self) -> RepositoryResult<Vec<Service>> {
        Ok(self.state.read().await.services.clone())
    }

    async fn list_news(&self) -> RepositoryResult<Vec<NewsItem>> {
        Ok(self.state.read().await.news.clone())
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn replace_products(&self, products: Vec<Product>) -> RepositoryResult<usize> {
        let count = products.len();
        self.state.write().await.products = products;
        debug!("Products replaced");
        Ok(count)
    }

    #[instrument(skip(self, services), fields(count = services.len()))]
    async fn replace_services(&self, services: Vec<Service>) -> RepositoryResult<usize> {
        let count = services.len();
        self.state.write().await.services = services;
        debug!("Services replaced");
        Ok(count)
    }

    #[instrument(skip(self, news), fields(count = news.len()))]
    async fn replace_news(&self, news: Vec<NewsItem>) -> RepositoryResult<usize> {
        let count = news.len();
        self.state.write().await.news = news;
        debug!("News replaced");
        Ok(count)
    }
}

/// Bookings held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: Booking) -> RepositoryResult<Booking> {
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_owner(&self, owner: &str) -> RepositoryResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|booking| booking.owner == owner)
            .cloned()
            .collect();
        newest_first(&mut bookings);
        Ok(bookings)
    }
}

/// Contact messages and profiles held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    contacts: Arc<RwLock<Vec<ContactMessage>>>,
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contacts(&self) -> Vec<ContactMessage> {
        self.contacts.read().await.clone()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save_contact(&self, message: ContactMessage) -> RepositoryResult<ContactMessage> {
        self.contacts.write().await.push(message.clone());
        Ok(message)
    }

    async fn upsert_profile(&self, profile: Profile) -> RepositoryResult<Profile> {
        self.profiles
            .write()
            .await
            .insert(profile.owner.clone(), profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, owner: &str) -> RepositoryResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(owner).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingItem, Category, ProfileUpdateRequest};

    fn product(name: &str) -> Product {
        Product::new(name, "Test product", 100, Category::Household, 5, None)
    }

    #[tokio::test]
    async fn test_replace_products_keeps_order() {
        let repo = InMemoryCatalogRepository::new();
        repo.replace_products(vec![product("old")]).await.unwrap();

        let fresh = vec![product("a"), product("b"), product("c")];
        let count = repo.replace_products(fresh.clone()).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(repo.list_products().await.unwrap(), fresh);
        assert_eq!(
            repo.find_product(&fresh[1].id).await.unwrap(),
            Some(fresh[1].clone())
        );
        assert_eq!(repo.find_product("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bookings_scoped_to_owner() {
        let repo = InMemoryBookingRepository::new();
        let line = BookingItem {
            product: product("Soap"),
            quantity: 1,
            price: 100,
        };

        let mut first = Booking::new("alice", vec![line.clone()]);
        first.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        repo.create(first.clone()).await.unwrap();
        let second = repo
            .create(Booking::new("alice", vec![line.clone()]))
            .await
            .unwrap();
        repo.create(Booking::new("bob", vec![line])).await.unwrap();

        let alice = repo.find_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].id, second.id);
        assert_eq!(alice[1].id, first.id);
        assert!(repo.find_by_owner("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_upsert_replaces() {
        let repo = InMemoryAccountRepository::new();
        for name in ["Ravi", "Ravi Kumar"] {
            let profile = Profile::from_request(
                "token",
                ProfileUpdateRequest {
                    name: name.to_string(),
                    phone: String::new(),
                },
            );
            repo.upsert_profile(profile).await.unwrap();
        }

        let stored = repo.find_profile("token").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ravi Kumar");
    }
}
