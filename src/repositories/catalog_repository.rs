use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;
use tracing::{info, instrument};

use super::dynamodb::{
    optional_s, parse_items, required_n, required_parsed, required_s, required_timestamp,
    DynamoDbTable, Item,
};
use crate::models::{NewsItem, Product, RepositoryResult, Service};
use crate::observability::Metrics;

/// Attribute holding the insertion position of catalog records
pub const SEQ_ATTRIBUTE: &str = "seq";

/// Trait defining the interface for catalog data access operations
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All products in insertion order
    async fn list_products(&self) -> RepositoryResult<Vec<Product>>;

    async fn find_product(&self, id: &str) -> RepositoryResult<Option<Product>>;

    async fn list_services(&self) -> RepositoryResult<Vec<Service>>;

    async fn list_news(&self) -> RepositoryResult<Vec<NewsItem>>;

    /// Delete all products and insert `products`; returns the number inserted
    async fn replace_products(&self, products: Vec<Product>) -> RepositoryResult<usize>;

    async fn replace_services(&self, services: Vec<Service>) -> RepositoryResult<usize>;

    async fn replace_news(&self, news: Vec<NewsItem>) -> RepositoryResult<usize>;
}

/// Table names backing the catalog
#[derive(Debug, Clone)]
pub struct CatalogTables {
    pub products: String,
    pub services: String,
    pub news: String,
}

/// DynamoDB implementation of the CatalogRepository trait
pub struct DynamoDbCatalogRepository {
    products: DynamoDbTable,
    services: DynamoDbTable,
    news: DynamoDbTable,
}

impl DynamoDbCatalogRepository {
    pub fn new(client: Arc<DynamoDbClient>, tables: CatalogTables, region: String) -> Self {
        Self {
            products: DynamoDbTable::new(client.clone(), tables.products, region.clone()),
            services: DynamoDbTable::new(client.clone(), tables.services, region.clone()),
            news: DynamoDbTable::new(client, tables.news, region),
        }
    }

    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self {
            products: self.products.with_metrics(metrics.clone()),
            services: self.services.with_metrics(metrics.clone()),
            news: self.news.with_metrics(metrics),
        }
    }

    pub fn products_table(&self) -> &str {
        self.products.name()
    }
}

fn with_seq(mut item: Item, seq: usize) -> Item {
    item.insert(SEQ_ATTRIBUTE.to_string(), AttributeValue::N(seq.to_string()));
    item
}

fn seq_of(item: &Item) -> u64 {
    required_n(item, SEQ_ATTRIBUTE).unwrap_or(u64::MAX)
}

/// Scan results sorted back into insertion order
fn in_insertion_order(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by_key(seq_of);
    items
}

/// Convert a Product struct to DynamoDB attribute values
pub fn product_to_item(product: &Product) -> Item {
    let mut item = Item::new();

    item.insert("id".to_string(), AttributeValue::S(product.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(product.name.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(product.description.clone()),
    );
    item.insert(
        "price".to_string(),
        AttributeValue::N(product.price.to_string()),
    );
    item.insert(
        "category".to_string(),
        AttributeValue::S(product.category.to_string()),
    );
    item.insert("in_stock".to_string(), AttributeValue::Bool(product.in_stock));
    item.insert(
        "stock_quantity".to_string(),
        AttributeValue::N(product.stock_quantity.to_string()),
    );
    if let Some(ref image) = product.image {
        item.insert("image".to_string(), AttributeValue::S(image.clone()));
    }

    item
}

/// Convert DynamoDB item to Product struct
pub fn item_to_product(item: &Item) -> RepositoryResult<Product> {
    let stock_quantity = required_n(item, "stock_quantity").unwrap_or(0);
    let in_stock = item
        .get("in_stock")
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(stock_quantity > 0);

    Ok(Product {
        id: required_s(item, "id")?.clone(),
        name: required_s(item, "name")?.clone(),
        description: required_s(item, "description")?.clone(),
        price: required_n(item, "price")?,
        category: required_parsed(item, "category")?,
        in_stock,
        stock_quantity,
        image: optional_s(item, "image"),
    })
}

pub fn service_to_item(service: &Service) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S(service.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(service.name.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(service.description.clone()),
    );
    item.insert("icon".to_string(), AttributeValue::S(service.icon.clone()));
    item
}

pub fn item_to_service(item: &Item) -> RepositoryResult<Service> {
    Ok(Service {
        id: required_s(item, "id")?.clone(),
        name: required_s(item, "name")?.clone(),
        description: required_s(item, "description")?.clone(),
        icon: required_s(item, "icon")?.clone(),
    })
}

pub fn news_to_item(news: &NewsItem) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S(news.id.clone()));
    item.insert("title".to_string(), AttributeValue::S(news.title.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(news.description.clone()),
    );
    item.insert(
        "category".to_string(),
        AttributeValue::S(news.category.clone()),
    );
    item.insert("date".to_string(), AttributeValue::S(news.date.to_rfc3339()));
    item.insert("author".to_string(), AttributeValue::S(news.author.clone()));
    item
}

pub fn item_to_news(item: &Item) -> RepositoryResult<NewsItem> {
    Ok(NewsItem {
        id: required_s(item, "id")?.clone(),
        title: required_s(item, "title")?.clone(),
        description: required_s(item, "description")?.clone(),
        category: required_s(item, "category")?.clone(),
        date: required_timestamp(item, "date")?,
        author: optional_s(item, "author").unwrap_or_default(),
    })
}

#[async_trait]
impl CatalogRepository for DynamoDbCatalogRepository {
    #[instrument(skip(self), fields(table = %self.products.name()))]
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        let items = in_insertion_order(self.products.scan_all(None).await?);
        let products = parse_items(items, "product", item_to_product);

        info!("Found {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self), fields(table = %self.products.name(), id = %id))]
    async fn find_product(&self, id: &str) -> RepositoryResult<Option<Product>> {
        match self.products.get("id", id).await? {
            Some(item) => {
                let product = item_to_product(&item)?;
                info!("Product found");
                Ok(Some(product))
            }
            None => {
                info!("Product not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(table = %self.services.name()))]
    async fn list_services(&self) -> RepositoryResult<Vec<Service>> {
        let items = in_insertion_order(self.services.scan_all(None).await?);
        let services = parse_items(items, "service", item_to_service);

        info!("Found {} services", services.len());
        Ok(services)
    }

    #[instrument(skip(self), fields(table = %self.news.name()))]
    async fn list_news(&self) -> RepositoryResult<Vec<NewsItem>> {
        let items = in_insertion_order(self.news.scan_all(None).await?);
        let news = parse_items(items, "news", item_to_news);

        info!("Found {} news items", news.len());
        Ok(news)
    }

    #[instrument(skip(self, products), fields(table = %self.products.name(), count = products.len()))]
    async fn replace_products(&self, products: Vec<Product>) -> RepositoryResult<usize> {
        let items = products
            .iter()
            .enumerate()
            .map(|(seq, product)| with_seq(product_to_item(product), seq))
            .collect();
        self.products.replace_all("id", items).await
    }

    #[instrument(skip(self, services), fields(table = %self.services.name(), count = services.len()))]
    async fn replace_services(&self, services: Vec<Service>) -> RepositoryResult<usize> {
        let items = services
            .iter()
            .enumerate()
            .map(|(seq, service)| with_seq(service_to_item(service), seq))
            .collect();
        self.services.replace_all("id", items).await
    }

    #[instrument(skip(self, news), fields(table = %self.news.name(), count = news.len()))]
    async fn replace_news(&self, news: Vec<NewsItem>) -> RepositoryResult<usize> {
        let items = news
            .iter()
            .enumerate()
            .map(|(seq, news)| with_seq(news_to_item(news), seq))
            .collect();
        self.news.replace_all("id", items).await
    }
}
