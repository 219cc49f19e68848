use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_document_id, BookingStatus, Product};

/// Placed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    /// Bearer credential the booking was placed with
    #[serde(default, skip_serializing)]
    pub owner: String,
    pub items: Vec<BookingItem>,
    pub total_amount: u64,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Line item priced at order time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingItem {
    pub product: Product,
    pub quantity: u32,
    pub price: u32,
}

/// Order-creation request body.
///
/// Lines carry product identifiers only; prices are resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub items: Vec<BookingLine>,
    pub total_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLine {
    pub product: String,
    pub quantity: u32,
}

/// Envelope returned by the bookings listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

impl Booking {
    /// Create a pending booking, computing the total from the priced lines
    pub fn new(owner: impl Into<String>, items: Vec<BookingItem>) -> Self {
        let total_amount = items.iter().map(BookingItem::line_total).sum();
        Self {
            id: new_document_id(),
            owner: owner.into(),
            items,
            total_amount,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Short customer-facing reference: last eight characters, upper-cased
    pub fn reference(&self) -> String {
        let start = self.id.len().saturating_sub(8);
        self.id.get(start..).unwrap_or(&self.id).to_uppercase()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl BookingItem {
    pub fn line_total(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}
