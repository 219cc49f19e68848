use tracing::{error, info, instrument, warn};

use super::cart::CartManager;
use super::error::{ClientError, ClientResult};
use super::http::ApiClient;
use crate::models::Booking;

/// Notice shown when an order could not be placed
pub const ORDER_FAILED_NOTICE: &str = "Failed to place order. Please try again.";

/// Submit the cart as a booking.
///
/// The cart is cleared only once the server has acknowledged the booking;
/// on any failure it is left exactly as it was. There is no retry.
///
/// Once acknowledged the order counts as placed even if the cart cannot be
/// cleared from the local store; that failure is only logged.
#[instrument(skip(api, cart), fields(lines = cart.line_count(), total = cart.total()))]
pub async fn submit_order(api: &ApiClient, cart: &mut CartManager) -> ClientResult<Booking> {
    if cart.is_empty() {
        return Err(ClientError::EmptyCart);
    }

    let request = cart.booking_request();
    let booking = api
        .create_booking(&request)
        .await
        .inspect_err(|e| warn!(error = %e, "Order submission failed"))?;

    if booking.total_amount != request.total_amount {
        warn!(
            cart_total = request.total_amount,
            booked_total = booking.total_amount,
            "Server priced the order differently from the cart"
        );
    }

    if let Err(e) = cart.clear() {
        error!(
            error = %e,
            reference = %booking.reference(),
            "Order placed but the cart could not be cleared"
        );
    }
    info!(reference = %booking.reference(), "Order placed");
    Ok(booking)
}
