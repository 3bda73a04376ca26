// --- File: crates/slotbook_booking/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use slotbook_slots::AvailableSlotList;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::BookingError;
use crate::logic::{
    book_slot, list_available_slots, process_webhook, BookSlotRequest, BookingResponse,
};
use crate::state::BookingState;

pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Free slots within the booking horizon.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/available-slots",
    responses(
        (status = 200, description = "Free slots, ascending by start", body = Vec<slotbook_slots::Slot>),
        (status = 500, description = "Calendar provider failed"),
        (status = 503, description = "Calendar service disabled")
    ),
    tag = "Booking"
))]
pub async fn available_slots_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<AvailableSlotList>, BookingError> {
    let slots = list_available_slots(&state, Utc::now()).await?;
    debug!("Returning {} available slots", slots.len());
    Ok(Json(slots))
}

/// Holds a slot and returns the checkout page to pay for it.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book-slot",
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Slot held, checkout session created", body = BookingResponse),
        (status = 400, description = "Invalid booking request"),
        (status = 409, description = "Slot already taken"),
        (status = 500, description = "Calendar or payment provider failed"),
        (status = 503, description = "Calendar or payment service disabled")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, BookingError> {
    // Malformed bodies are a 400 like any other invalid request.
    let Json(request) =
        payload.map_err(|rejection| BookingError::Validation(rejection.body_text()))?;
    info!("Booking request from {}", request.email.trim());
    let response = book_slot(&state, request, Utc::now()).await?;
    Ok(Json(response))
}

/// Stripe webhook endpoint. Needs the raw body for signature verification.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/webhook",
    params(
        ("Stripe-Signature" = String, Header, description = "Stripe webhook signature")
    ),
    responses(
        (status = 200, description = "Webhook received and applied"),
        (status = 400, description = "Signature verification failed or bad payload"),
        (status = 500, description = "Calendar provider failed, Stripe will retry"),
        (status = 503, description = "Payment service disabled")
    ),
    tag = "Booking"
))]
pub async fn webhook_handler(
    State(state): State<Arc<BookingState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, BookingError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let outcome = process_webhook(&state, &body, signature).await?;
    debug!("Webhook outcome: {:?}", outcome);
    Ok((StatusCode::OK, "Webhook received").into_response())
}
