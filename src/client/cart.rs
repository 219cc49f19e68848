use std::sync::Arc;
use tracing::{debug, warn};

use super::error::StorageResult;
use super::storage::{KeyValueStore, CART_KEY};
use crate::models::{cart_total, CartItem, CreateBookingRequest, Product};

/// Shopping cart mirrored to the local store.
///
/// Every mutation builds the next cart, writes the whole snapshot under
/// [`CART_KEY`] and only then replaces the in-memory lines. A failed write
/// leaves both sides as they were.
pub struct CartManager {
    store: Arc<dyn KeyValueStore>,
    items: Vec<CartItem>,
}

impl CartManager {
    /// Restore the cart saved in `store`.
    ///
    /// A missing snapshot and an unreadable one both give an empty cart.
    pub fn load(store: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let items = match store.get(CART_KEY)? {
            None => Vec::new(),
            Some(snapshot) => match serde_json::from_str::<Vec<CartItem>>(&snapshot) {
                Ok(items) => items.into_iter().filter(|item| item.quantity > 0).collect(),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart snapshot");
                    Vec::new()
                }
            },
        };

        debug!(lines = items.len(), "Cart loaded");
        Ok(Self { store, items })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price × quantity at the prices held in the cart
    pub fn total(&self) -> u64 {
        cart_total(&self.items)
    }

    /// Number of distinct products
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Add one unit, merging with an existing line for the same product
    pub fn add(&mut self, product: Product) -> StorageResult<()> {
        let mut next = self.items.clone();
        match next.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => next.push(CartItem::new(product)),
        }
        self.commit(next)
    }

    /// Set a line's quantity; zero or below removes the line
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> StorageResult<()> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut next = self.items.clone();
        match next.iter_mut().find(|item| item.product.id == product_id) {
            Some(item) => item.quantity = quantity,
            None => return Ok(()),
        }
        self.commit(next)
    }

    pub fn remove(&mut self, product_id: &str) -> StorageResult<()> {
        if !self.items.iter().any(|item| item.product.id == product_id) {
            return Ok(());
        }

        let next = self
            .items
            .iter()
            .filter(|item| item.product.id != product_id)
            .cloned()
            .collect();
        self.commit(next)
    }

    pub fn clear(&mut self) -> StorageResult<()> {
        self.commit(Vec::new())
    }

    /// Order request for the current lines, carrying the client-side total
    pub fn booking_request(&self) -> CreateBookingRequest {
        CreateBookingRequest {
            items: self.items.iter().map(CartItem::to_booking_line).collect(),
            total_amount: self.total(),
        }
    }

    fn commit(&mut self, next: Vec<CartItem>) -> StorageResult<()> {
        let snapshot = serde_json::to_string(&next)?;
        self.store.set(CART_KEY, &snapshot)?;
        self.items = next;
        Ok(())
    }
}
