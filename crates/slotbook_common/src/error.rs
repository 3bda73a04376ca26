// --- File: crates/slotbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error every Slotbook HTTP surface ends up rendering.
///
/// Domain crates keep their own error enums and convert into this one at the boundary.
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// A payload could not be decoded
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request body failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A webhook's signature did not verify
    #[error("Webhook Error: {0}")]
    WebhookSignatureError(String),

    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The requested slot is already taken
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// A provider is switched off or was never configured
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Maps an error onto an HTTP status code.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotbookError {
    fn status_code(&self) -> u16 {
        match self {
            SlotbookError::ParseError(_)
            | SlotbookError::ValidationError(_)
            | SlotbookError::WebhookSignatureError(_) => 400,
            SlotbookError::ConflictError(_) => 409,
            SlotbookError::ServiceUnavailable(_) => 503,
            SlotbookError::ConfigError(_) | SlotbookError::ExternalServiceError { .. } => 500,
        }
    }
}

impl SlotbookError {
    /// Message safe to show a client. Server-side failures collapse to a generic text; their
    /// detail belongs in the log.
    pub fn public_message(&self) -> String {
        match self {
            SlotbookError::ConfigError(_) | SlotbookError::ExternalServiceError { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SlotbookError {
    SlotbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
