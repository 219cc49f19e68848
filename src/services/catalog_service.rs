use std::sync::Arc;
use tracing::instrument;

use crate::models::{NewsItem, Product, Service, ServiceError, ServiceResult};
use crate::repositories::CatalogRepository;

/// Read access to products, services and news
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let products = self.repository.list_products().await?;
        crate::info_with_trace!("Listed {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        if id.trim().is_empty() {
            return Err(ServiceError::ValidationError {
                message: "Product ID cannot be empty".to_string(),
            });
        }

        self.repository
            .find_product(id)
            .await?
            .ok_or_else(|| ServiceError::ProductNotFound { id: id.to_string() })
    }

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> ServiceResult<Vec<Service>> {
        let services = self.repository.list_services().await?;
        crate::info_with_trace!("Listed {} services", services.len());
        Ok(services)
    }

    #[instrument(skip(self))]
    pub async fn list_news(&self) -> ServiceResult<Vec<NewsItem>> {
        let news = self.repository.list_news().await?;
        crate::info_with_trace!("Listed {} news items", news.len());
        Ok(news)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RepositoryError};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        TestCatalogRepository {}

        #[async_trait]
        impl CatalogRepository for TestCatalogRepository {
            async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
            async fn find_product(&self, id: &str) -> Result<Option<Product>, RepositoryError>;
            async fn list_services(&self) -> Result<Vec<Service>, RepositoryError>;
            async fn list_news(&self) -> Result<Vec<NewsItem>, RepositoryError>;
            async fn replace_products(&self, products: Vec<Product>) -> Result<usize, RepositoryError>;
            async fn replace_services(&self, services: Vec<Service>) -> Result<usize, RepositoryError>;
            async fn replace_news(&self, news: Vec<NewsItem>) -> Result<usize, RepositoryError>;
        }
    }

    fn create_test_product() -> Product {
        Product::new(
            "Organic Fertilizer (5kg)",
            "Natural organic fertilizer",
            280,
            Category::Agriculture,
            45,
            None,
        )
    }

    #[tokio::test]
    async fn test_list_products_success() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let products = vec![create_test_product()];
        let expected = products.clone();

        mock_repo
            .expect_list_products()
            .times(1)
            .returning(move || Ok(products.clone()));

        let service = CatalogService::new(Arc::new(mock_repo));
        assert_eq!(service.list_products().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_get_product_success() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let product = create_test_product();
        let id = product.id.clone();

        mock_repo
            .expect_find_product()
            .with(mockall::predicate::eq(id.clone()))
            .times(1)
            .returning(move |_| Ok(Some(product.clone())));

        let service = CatalogService::new(Arc::new(mock_repo));
        assert_eq!(service.get_product(&id).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockTestCatalogRepository::new();
        mock_repo
            .expect_find_product()
            .times(1)
            .returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(mock_repo));
        let result = service.get_product("missing").await;

        assert!(matches!(result, Err(ServiceError::ProductNotFound { id }) if id == "missing"));
    }

    #[tokio::test]
    async fn test_get_product_empty_id() {
        let mock_repo = MockTestCatalogRepository::new();
        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.get_product("  ").await;
        assert!(matches!(result, Err(ServiceError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_repository_error_propagates() {
        let mut mock_repo = MockTestCatalogRepository::new();
        mock_repo
            .expect_list_news()
            .times(1)
            .returning(|| Err(RepositoryError::ConnectionFailed));

        let service = CatalogService::new(Arc::new(mock_repo));
        let result = service.list_news().await;

        assert!(matches!(result, Err(ServiceError::Repository { .. })));
    }
}
