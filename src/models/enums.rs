use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product categories carried by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Groceries,
    Medicines,
    Household,
    Electronics,
    Agriculture,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Groceries,
        Category::Medicines,
        Category::Household,
        Category::Electronics,
        Category::Agriculture,
        Category::Clothing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Medicines => "medicines",
            Category::Household => "household",
            Category::Electronics => "electronics",
            Category::Agriculture => "agriculture",
            Category::Clothing => "clothing",
        }
    }

    /// Capitalised label used in category pickers
    pub fn label(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Medicines => "Medicines",
            Category::Household => "Household",
            Category::Electronics => "Electronics",
            Category::Agriculture => "Agriculture",
            Category::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groceries" => Ok(Category::Groceries),
            "medicines" => Ok(Category::Medicines),
            "household" => Ok(Category::Household),
            "electronics" => Ok(Category::Electronics),
            "agriculture" => Ok(Category::Agriculture),
            "clothing" => Ok(Category::Clothing),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Lifecycle status of a booking.
///
/// Only `Pending` is ever assigned here; later transitions belong to the
/// order-management side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Processing => "processing",
            BookingStatus::Shipped => "shipped",
            BookingStatus::Delivered => "delivered",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Processing => "Processing",
            BookingStatus::Shipped => "Shipped",
            BookingStatus::Delivered => "Delivered",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "processing" => Ok(BookingStatus::Processing),
            "shipped" => Ok(BookingStatus::Shipped),
            "delivered" => Ok(BookingStatus::Delivered),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Glyph shown next to a service listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceIcon {
    Truck,
    Heart,
    Shield,
    Clock,
    Users,
    Package,
}

impl ServiceIcon {
    /// Map a stored icon tag to a glyph; unknown tags fall back to `Package`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "truck" => ServiceIcon::Truck,
            "heart" => ServiceIcon::Heart,
            "shield" => ServiceIcon::Shield,
            "clock" => ServiceIcon::Clock,
            "users" => ServiceIcon::Users,
            _ => ServiceIcon::Package,
        }
    }
}
