// --- File: crates/slotbook_common/src/services.rs ---
//! Provider abstractions.
//!
//! The booking surface talks to the calendar and the payment provider only through these
//! traits, so handlers can be driven by in-memory doubles in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_slots::ReservedInterval;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Type-erased provider error.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl BoxedError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

// --- Calendar ---

/// Calendar event status as the provider spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Tentative => "tentative",
            EventStatus::Confirmed => "confirmed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendee_emails: Vec<String>,
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: String,
    pub status: String,
}

pub trait CalendarService: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Busy intervals overlapping `[time_min, time_max)`, cancelled events excluded.
    fn list_reserved(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<ReservedInterval>, Self::Error>;

    fn insert_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Moves a held event to `confirmed`.
    fn confirm_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Deletes an event. An event that is already gone counts as deleted.
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error>;
}

// --- Payments ---

/// Checkout metadata key carrying the held calendar event id.
pub const BOOKING_REF_METADATA_KEY: &str = "booking_event_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Smallest currency unit (cents for USD).
    pub unit_amount_cents: i64,
    pub currency: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub line_item: LineItem,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub client_reference_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

/// A verified webhook notification, reduced to what booking cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    CheckoutCompleted {
        session_id: String,
        booking_ref: Option<String>,
        paid: bool,
    },
    CheckoutExpired {
        session_id: String,
        booking_ref: Option<String>,
    },
    Other {
        event_type: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("{0}")]
    SignatureInvalid(String),
    #[error("Invalid webhook payload: {0}")]
    Payload(String),
}

pub trait PaymentService: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error>;

    /// Verifies `signature_header` against the raw body and decodes the event.
    fn parse_webhook_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, WebhookError>;
}

// --- Type erasure ---

/// Wraps a concrete calendar provider so it can live behind
/// `Arc<dyn CalendarService<Error = BoxedError>>`.
pub struct ErasedCalendarService<S>(pub S);

impl<S: CalendarService> CalendarService for ErasedCalendarService<S> {
    type Error = BoxedError;

    fn list_reserved(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<ReservedInterval>, Self::Error> {
        let inner = self.0.list_reserved(calendar_id, time_min, time_max);
        Box::pin(async move { inner.await.map_err(BoxedError::new) })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let inner = self.0.insert_event(calendar_id, event);
        Box::pin(async move { inner.await.map_err(BoxedError::new) })
    }

    fn confirm_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let inner = self.0.confirm_event(calendar_id, event_id);
        Box::pin(async move { inner.await.map_err(BoxedError::new) })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let inner = self.0.delete_event(calendar_id, event_id);
        Box::pin(async move { inner.await.map_err(BoxedError::new) })
    }
}

/// Payment counterpart of [`ErasedCalendarService`].
pub struct ErasedPaymentService<S>(pub S);

impl<S: PaymentService> PaymentService for ErasedPaymentService<S> {
    type Error = BoxedError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        let inner = self.0.create_checkout_session(request);
        Box::pin(async move { inner.await.map_err(BoxedError::new) })
    }

    fn parse_webhook_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, WebhookError> {
        self.0.parse_webhook_event(payload, signature_header)
    }
}

pub type DynCalendarService = Arc<dyn CalendarService<Error = BoxedError>>;
pub type DynPaymentService = Arc<dyn PaymentService<Error = BoxedError>>;

pub fn erase_calendar<S: CalendarService + 'static>(service: S) -> DynCalendarService {
    Arc::new(ErasedCalendarService(service))
}

pub fn erase_payment<S: PaymentService + 'static>(service: S) -> DynPaymentService {
    Arc::new(ErasedPaymentService(service))
}

/// Hands out the providers that are enabled and configured.
pub trait ServiceFactory: Send + Sync {
    fn calendar_service(&self) -> Option<DynCalendarService>;

    fn payment_service(&self) -> Option<DynPaymentService>;
}
