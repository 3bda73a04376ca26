// --- File: crates/slotbook_stripe/src/error.rs ---
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripeError {
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse Stripe payload: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Stripe configuration missing or incomplete: {0}")]
    ConfigError(String),

    #[error("Stripe webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    #[error("Stripe response missing checkout URL")]
    MissingCheckoutUrl,
}
