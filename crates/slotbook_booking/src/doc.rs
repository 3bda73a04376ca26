// --- File: crates/slotbook_booking/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{BookSlotRequest, BookingResponse, SlotSelection};
use slotbook_slots::Slot;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::available_slots_handler,
        crate::handlers::book_slot_handler,
        crate::handlers::webhook_handler,
    ),
    components(schemas(Slot, SlotSelection, BookSlotRequest, BookingResponse)),
    tags(
        (name = "Booking", description = "Slot availability, checkout and payment webhook")
    ),
    servers(
        (url = "/api", description = "Slotbook API server")
    )
)]
pub struct BookingApiDoc;
