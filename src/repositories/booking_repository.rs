use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;
use tracing::{info, instrument};

use super::catalog_repository::{item_to_product, product_to_item};
use super::dynamodb::{
    parse_items, required_n, required_parsed, required_s, required_timestamp, DynamoDbTable, Item,
    ScanFilter,
};
use crate::models::{Booking, BookingItem, RepositoryError, RepositoryResult};
use crate::observability::Metrics;

/// Trait defining the interface for booking data access operations
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking
    async fn create(&self, booking: Booking) -> RepositoryResult<Booking>;

    /// Bookings placed by `owner`, newest first
    async fn find_by_owner(&self, owner: &str) -> RepositoryResult<Vec<Booking>>;
}

/// DynamoDB implementation of the BookingRepository trait
pub struct DynamoDbBookingRepository {
    table: DynamoDbTable,
}

impl DynamoDbBookingRepository {
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            table: DynamoDbTable::new(client, table_name, region),
        }
    }

    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self {
            table: self.table.with_metrics(metrics),
        }
    }

    pub fn table_name(&self) -> &str {
        self.table.name()
    }
}

fn booking_item_to_map(line: &BookingItem) -> AttributeValue {
    let mut map = Item::new();
    map.insert(
        "product".to_string(),
        AttributeValue::M(product_to_item(&line.product)),
    );
    map.insert(
        "quantity".to_string(),
        AttributeValue::N(line.quantity.to_string()),
    );
    map.insert("price".to_string(), AttributeValue::N(line.price.to_string()));
    AttributeValue::M(map)
}

fn map_to_booking_item(value: &AttributeValue) -> RepositoryResult<BookingItem> {
    let map = value.as_m().map_err(|_| RepositoryError::InvalidItem {
        message: "Booking line is not a map".to_string(),
    })?;
    let product = map
        .get("product")
        .and_then(|v| v.as_m().ok())
        .ok_or_else(|| RepositoryError::InvalidItem {
            message: "Missing product".to_string(),
        })?;

    Ok(BookingItem {
        product: item_to_product(product)?,
        quantity: required_n(map, "quantity")?,
        price: required_n(map, "price")?,
    })
}

/// Convert a Booking struct to DynamoDB attribute values
pub fn booking_to_item(booking: &Booking) -> Item {
    let mut item = Item::new();

    item.insert("id".to_string(), AttributeValue::S(booking.id.clone()));
    item.insert("owner".to_string(), AttributeValue::S(booking.owner.clone()));
    item.insert(
        "items".to_string(),
        AttributeValue::L(booking.items.iter().map(booking_item_to_map).collect()),
    );
    item.insert(
        "total_amount".to_string(),
        AttributeValue::N(booking.total_amount.to_string()),
    );
    item.insert(
        "status".to_string(),
        AttributeValue::S(booking.status.to_string()),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(booking.created_at.to_rfc3339()),
    );

    item
}

/// Convert DynamoDB item to Booking struct
pub fn item_to_booking(item: &Item) -> RepositoryResult<Booking> {
    let items = item
        .get("items")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .map(map_to_booking_item)
                .collect::<RepositoryResult<Vec<_>>>()
        })
        .unwrap_or_else(|| Ok(Vec::new()))?;

    Ok(Booking {
        id: required_s(item, "id")?.clone(),
        owner: required_s(item, "owner")?.clone(),
        items,
        total_amount: required_n(item, "total_amount")?,
        status: required_parsed(item, "status")?,
        created_at: required_timestamp(item, "created_at")?,
    })
}

/// Sort newest first
pub(crate) fn newest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl BookingRepository for DynamoDbBookingRepository {
    #[instrument(skip(self, booking), fields(table = %self.table.name(), id = %booking.id))]
    async fn create(&self, booking: Booking) -> RepositoryResult<Booking> {
        info!("Creating new booking");

        self.table.put(booking_to_item(&booking)).await?;

        info!("Booking created successfully");
        Ok(booking)
    }

    #[instrument(skip(self, owner), fields(table = %self.table.name()))]
    async fn find_by_owner(&self, owner: &str) -> RepositoryResult<Vec<Booking>> {
        let filter = ScanFilter::eq("owner", owner);
        let items = self.table.scan_all(Some(&filter)).await?;

        let mut bookings = parse_items(items, "booking", item_to_booking);
        newest_first(&mut bookings);

        info!("Found {} bookings", bookings.len());
        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, Category, Product};

    fn create_test_booking() -> Booking {
        let rice = Product::new(
            "Premium Basmati Rice (5kg)",
            "Aromatic long-grain basmati rice",
            450,
            Category::Groceries,
            100,
            None,
        );
        Booking::new(
            "token-1",
            vec![BookingItem {
                product: rice,
                quantity: 2,
                price: 450,
            }],
        )
    }

    #[test]
    fn test_booking_to_item_conversion() {
        let booking = create_test_booking();
        let item = booking_to_item(&booking);

        assert!(item.contains_key("owner"));
        if let Some(AttributeValue::L(lines)) = item.get("items") {
            assert_eq!(lines.len(), 1);
        } else {
            panic!("Expected list value for items");
        }
        if let Some(AttributeValue::S(status)) = item.get("status") {
            assert_eq!(status, "pending");
        } else {
            panic!("Expected string value for status");
        }
    }

    #[test]
    fn test_item_to_booking_conversion() {
        let booking = create_test_booking();
        let converted = item_to_booking(&booking_to_item(&booking)).unwrap();

        assert_eq!(converted, booking);
        assert_eq!(converted.total_amount, 900);
        assert_eq!(converted.status, BookingStatus::Pending);
    }

    #[test]
    fn test_invalid_booking_line_rejected() {
        let mut item = booking_to_item(&create_test_booking());
        item.insert(
            "items".to_string(),
            AttributeValue::L(vec![AttributeValue::S("bogus".to_string())]),
        );
        assert!(item_to_booking(&item).is_err());
    }

    #[test]
    fn test_newest_first() {
        let mut older = create_test_booking();
        older.created_at = chrono::Utc::now() - chrono::Duration::hours(1);
        let newer = create_test_booking();

        let mut bookings = vec![older.clone(), newer.clone()];
        newest_first(&mut bookings);
        assert_eq!(bookings[0].id, newer.id);
        assert_eq!(bookings[1].id, older.id);
    }

    #[test]
    fn test_repository_creation() {
        let config = aws_sdk_dynamodb::Config::builder()
            .region(aws_sdk_dynamodb::config::Region::new("ap-south-1"))
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .build();
        let client = Arc::new(aws_sdk_dynamodb::Client::from_conf(config));
        let repo = DynamoDbBookingRepository::new(
            client,
            "bookings".to_string(),
            "ap-south-1".to_string(),
        );

        assert_eq!(repo.table_name(), "bookings");
    }
}
