// Services module - business logic layer

pub mod account_service;
pub mod booking_service;
pub mod catalog_service;

pub use account_service::AccountService;
pub use booking_service::BookingService;
pub use catalog_service::CatalogService;
