// --- File: crates/slotbook_stripe/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;

pub use error::StripeError;
pub use service::StripePaymentService;
