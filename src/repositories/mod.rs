// Repositories module - data access layer

pub mod account_repository;
pub mod booking_repository;
pub mod catalog_repository;
pub mod dynamodb;
pub mod memory;

pub use account_repository::{AccountRepository, DynamoDbAccountRepository};
pub use booking_repository::{BookingRepository, DynamoDbBookingRepository};
pub use catalog_repository::{CatalogRepository, CatalogTables, DynamoDbCatalogRepository};
pub use dynamodb::DynamoDbTable;
pub use memory::{InMemoryAccountRepository, InMemoryBookingRepository, InMemoryCatalogRepository};
