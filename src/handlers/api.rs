use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::auth::BearerToken;
use crate::models::{
    Booking, BookingListResponse, ContactRequest, ContactResponse, CreateBookingRequest, NewsItem,
    Product, Profile, ProfileUpdateRequest, RepositoryError, Service, ServiceError,
};
use crate::observability::BusinessTracingMiddleware;
use crate::services::{AccountService, BookingService, CatalogService};

pub const CONTACT_ACK: &str = "Thank you for reaching out. We will get back to you soon.";

type ApiError = (StatusCode, Json<Value>);

/// Shared application state containing all services
#[derive(Clone)]
pub struct ApiState {
    pub catalog_service: Arc<CatalogService>,
    pub booking_service: Arc<BookingService>,
    pub account_service: Arc<AccountService>,
    pub business: BusinessTracingMiddleware,
}

// =============================================================================
// CATALOG ENDPOINTS
// =============================================================================

#[instrument(name = "list_products", skip(state))]
pub async fn list_products(State(state): State<ApiState>) -> Result<Json<Vec<Product>>, ApiError> {
    state
        .business
        .trace_catalog_read("products", state.catalog_service.list_products())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "list_services", skip(state))]
pub async fn list_services(State(state): State<ApiState>) -> Result<Json<Vec<Service>>, ApiError> {
    state
        .business
        .trace_catalog_read("services", state.catalog_service.list_services())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "list_news", skip(state))]
pub async fn list_news(State(state): State<ApiState>) -> Result<Json<Vec<NewsItem>>, ApiError> {
    state
        .business
        .trace_catalog_read("news", state.catalog_service.list_news())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

// =============================================================================
// BOOKING ENDPOINTS
// =============================================================================

/// Bookings placed with the caller's token, newest first
#[instrument(name = "list_bookings", skip(state, token))]
pub async fn list_bookings(
    State(state): State<ApiState>,
    token: BearerToken,
) -> Result<Json<BookingListResponse>, ApiError> {
    match state
        .business
        .trace_booking_operation("list", state.booking_service.list_bookings(token.as_str()))
        .await
    {
        Ok(bookings) => Ok(Json(BookingListResponse { bookings })),
        Err(err) => {
            error!("Failed to list bookings: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "create_booking", skip(state, token, request), fields(
    lines = request.items.len(),
    client_total = request.total_amount,
))]
pub async fn create_booking(
    State(state): State<ApiState>,
    token: BearerToken,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    crate::info_with_trace!("Creating booking with {} lines", request.items.len());

    match state
        .business
        .trace_booking_operation(
            "create",
            state.booking_service.create_booking(token.as_str(), request),
        )
        .await
    {
        Ok(booking) => {
            crate::info_with_trace!("Booking {} created", booking.reference());
            Ok((StatusCode::CREATED, Json(booking)))
        }
        Err(err) => {
            error!("Failed to create booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// ACCOUNT ENDPOINTS
// =============================================================================

#[instrument(name = "update_profile", skip(state, token, request))]
pub async fn update_profile(
    State(state): State<ApiState>,
    token: BearerToken,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<Profile>, ApiError> {
    match state
        .account_service
        .update_profile(token.as_str(), request)
        .await
    {
        Ok(profile) => Ok(Json(profile)),
        Err(err) => {
            error!("Failed to update profile: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "submit_contact", skip(state, request))]
pub async fn submit_contact(
    State(state): State<ApiState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    match state.account_service.submit_contact(request).await {
        Ok(message) => {
            info!(id = %message.id, "Contact message stored");
            Ok((
                StatusCode::CREATED,
                Json(ContactResponse {
                    success: true,
                    message: CONTACT_ACK.to_string(),
                }),
            ))
        }
        Err(err) => {
            error!("Failed to store contact message: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert ServiceError to HTTP response
pub fn service_error_to_response(err: ServiceError) -> ApiError {
    let (status, message) = match err {
        ServiceError::ProductNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::EmptyBooking => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::ProductUnavailable { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::Repository { source } => match source {
            RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            RepositoryError::ConnectionFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection failed".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
