// --- File: crates/slotbook_booking/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod state;
#[cfg(test)]
mod test_support;

pub use error::BookingError;
pub use state::BookingState;
