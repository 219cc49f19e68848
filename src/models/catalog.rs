use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, ServiceIcon};

/// Image shown when a product carries no image of its own
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/264636/pexels-photo-264636.jpeg?auto=compress&cs=tinysrgb&w=500";

/// Generate a 24 character hex document identifier
pub fn new_document_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id.get(0..24).unwrap_or(&id).to_string()
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub category: Category,
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product with a fresh identifier
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: u32,
        category: Category,
        stock_quantity: u32,
        image: Option<String>,
    ) -> Self {
        Self {
            id: new_document_id(),
            name: name.into(),
            description: description.into(),
            price,
            category,
            in_stock: stock_quantity > 0,
            stock_quantity,
            image,
        }
    }

    pub fn image_or_placeholder(&self) -> &str {
        self.image.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Service offered to rural customers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl Service {
    pub fn new(name: impl Into<String>, description: impl Into<String>, icon: &str) -> Self {
        Self {
            id: new_document_id(),
            name: name.into(),
            description: description.into(),
            icon: icon.to_string(),
        }
    }

    pub fn glyph(&self) -> ServiceIcon {
        ServiceIcon::from_tag(&self.icon)
    }
}

/// News article shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        date: DateTime<Utc>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: new_document_id(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            date,
            author: author.into(),
        }
    }
}
