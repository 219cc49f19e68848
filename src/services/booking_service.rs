use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    Booking, BookingItem, BookingLine, CreateBookingRequest, ServiceError, ServiceResult, Validate,
};
use crate::repositories::{BookingRepository, CatalogRepository};

/// Places and lists bookings.
///
/// Line prices always come from the catalog; the total sent by the client is
/// only compared against the computed one.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { bookings, catalog }
    }

    /// Bookings placed by `owner`, newest first
    #[instrument(skip(self, owner))]
    pub async fn list_bookings(&self, owner: &str) -> ServiceResult<Vec<Booking>> {
        let bookings = self.bookings.find_by_owner(owner).await?;
        crate::info_with_trace!("Found {} bookings", bookings.len());
        Ok(bookings)
    }

    #[instrument(skip(self, owner, request), fields(lines = request.items.len()))]
    pub async fn create_booking(
        &self,
        owner: &str,
        request: CreateBookingRequest,
    ) -> ServiceResult<Booking> {
        if request.items.is_empty() {
            return Err(ServiceError::EmptyBooking);
        }
        request.validate()?;

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            items.push(self.price_line(line).await?);
        }

        let booking = Booking::new(owner, items);
        if booking.total_amount != request.total_amount {
            crate::warn_with_trace!(
                client_total = request.total_amount,
                server_total = booking.total_amount,
                "Client total differs from catalog pricing; using catalog total"
            );
        }

        let booking = self.bookings.create(booking).await?;
        crate::info_with_trace!(
            booking_id = %booking.id,
            total_amount = booking.total_amount,
            "Booking created"
        );
        Ok(booking)
    }

    /// Resolve a request line against the catalog, checking availability
    async fn price_line(&self, line: &BookingLine) -> ServiceResult<BookingItem> {
        let product = self
            .catalog
            .find_product(&line.product)
            .await?
            .ok_or_else(|| ServiceError::ProductNotFound {
                id: line.product.clone(),
            })?;

        if !product.in_stock {
            return Err(ServiceError::ProductUnavailable {
                product_id: product.id,
            });
        }

        if line.quantity > product.stock_quantity {
            return Err(ServiceError::InsufficientStock {
                product_id: product.id,
                requested: line.quantity,
                available: product.stock_quantity,
            });
        }

        Ok(BookingItem {
            price: product.price,
            quantity: line.quantity,
            product,
        })
    }
}
