// --- File: crates/slotbook_booking/src/error.rs ---
use axum::response::{IntoResponse, Response};
use slotbook_common::services::{BoxedError, WebhookError};
use slotbook_common::{external_service_error, SlotbookError};
use slotbook_slots::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Requested time slot is no longer available")]
    SlotTaken,
    /// The named provider is switched off or not configured.
    #[error("{0} service is disabled")]
    Disabled(&'static str),
    #[error("Invalid availability template: {0}")]
    Template(#[from] TemplateError),
    #[error("Calendar provider failed: {0}")]
    Calendar(BoxedError),
    #[error("Payment provider failed: {0}")]
    Payment(BoxedError),
    #[error("{0}")]
    Signature(String),
    #[error("{0}")]
    Payload(String),
}

impl From<WebhookError> for BookingError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::SignatureInvalid(msg) => BookingError::Signature(msg),
            WebhookError::Payload(msg) => BookingError::Payload(msg),
        }
    }
}

impl From<BookingError> for SlotbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => SlotbookError::ValidationError(msg),
            BookingError::SlotTaken => SlotbookError::ConflictError(
                "Requested time slot is no longer available".to_string(),
            ),
            BookingError::Disabled(name) => {
                SlotbookError::ServiceUnavailable(format!("{} service is disabled", name))
            }
            BookingError::Template(e) => SlotbookError::ConfigError(e.to_string()),
            BookingError::Calendar(e) => external_service_error("calendar", e),
            BookingError::Payment(e) => external_service_error("payment", e),
            BookingError::Signature(msg) => SlotbookError::WebhookSignatureError(msg),
            BookingError::Payload(msg) => SlotbookError::ParseError(msg),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        SlotbookError::from(self).into_response()
    }
}
