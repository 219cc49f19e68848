use serde::{Deserialize, Serialize};

use super::{BookingLine, Product};

/// Product selected for purchase together with its quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Line total at the catalog price held in the cart
    pub fn total_price(&self) -> u64 {
        u64::from(self.product.price) * u64::from(self.quantity)
    }

    /// Order line sent to the booking endpoint
    pub fn to_booking_line(&self) -> BookingLine {
        BookingLine {
            product: self.product.id.clone(),
            quantity: self.quantity,
        }
    }
}

/// Sum of price × quantity over all lines
pub fn cart_total(items: &[CartItem]) -> u64 {
    items.iter().map(CartItem::total_price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_cart_total() {
        let rice = Product::new("Rice", "Basmati rice", 450, Category::Groceries, 10, None);
        let tea = Product::new("Tea", "Tea leaves", 95, Category::Groceries, 10, None);

        let items = vec![
            CartItem::new(rice),
            CartItem {
                product: tea,
                quantity: 3,
            },
        ];

        assert_eq!(cart_total(&items), 450 + 285);
        assert_eq!(cart_total(&[]), 0);
    }

    #[test]
    fn test_booking_line_carries_id_not_price() {
        let rice = Product::new("Rice", "Basmati rice", 450, Category::Groceries, 10, None);
        let item = CartItem {
            product: rice.clone(),
            quantity: 2,
        };

        let line = item.to_booking_line();
        assert_eq!(line.product, rice.id);
        assert_eq!(line.quantity, 2);
    }
}
