// --- File: crates/slotbook_gcal/src/lib.rs ---
//! Google Calendar provider: authentication, event mapping and the
//! [`CalendarService`](slotbook_common::services::CalendarService) implementation.

pub mod auth;
pub mod logic;
pub mod service;

pub use auth::{create_calendar_hub, HubType};
pub use service::{GcalServiceError, GoogleCalendarService};
