// --- File: crates/slotbook_booking/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{available_slots_handler, book_slot_handler, webhook_handler};
use crate::state::BookingState;

/// Booking routes, relative to the `/api` prefix the backend nests them under.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/available-slots", get(available_slots_handler))
        .route("/book-slot", post(book_slot_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(state)
}
