// --- File: crates/slotbook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Provider abstractions

pub use error::{external_service_error, HttpStatusCode, SlotbookError};

pub use http::client::HTTP_CLIENT;

pub use logging::{init_from_config, init_with_level, init_with_options, parse_level};
