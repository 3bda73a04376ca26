// In-memory providers for booking tests.
use chrono::{DateTime, Utc};
use slotbook_common::services::{
    erase_calendar, erase_payment, BoxFuture, CalendarEventResult, CalendarService,
    CheckoutRequest, CheckoutSession, EventStatus, NewCalendarEvent, PaymentEvent,
    PaymentService, WebhookError,
};
use slotbook_config::{
    AppConfig, AvailabilityConfig, DailyWindowConfig, GcalConfig, LoggingConfig, ServerConfig,
    StripeConfig,
};
use slotbook_slots::ReservedInterval;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::state::BookingState;

pub const GOOD_SIGNATURE: &str = "t=1,v1=good";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct DoubleError(pub String);

#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub id: String,
    pub event: NewCalendarEvent,
    pub status: EventStatus,
}

#[derive(Default)]
pub struct CalendarBook {
    pub events: Vec<StoredEvent>,
    /// Busy time owned by someone else.
    pub external: Vec<ReservedInterval>,
    pub fail_list: bool,
    pub fail_insert: bool,
    pub fail_confirm: bool,
    pub list_calls: usize,
    pub deleted: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryCalendar {
    pub book: Arc<Mutex<CalendarBook>>,
}

impl InMemoryCalendar {
    pub fn events(&self) -> Vec<StoredEvent> {
        self.book.lock().unwrap().events.clone()
    }

    pub fn block(&self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.book
            .lock()
            .unwrap()
            .external
            .push(ReservedInterval::new(start, end));
    }
}

impl CalendarService for InMemoryCalendar {
    type Error = DoubleError;

    fn list_reserved(
        &self,
        _calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<ReservedInterval>, Self::Error> {
        Box::pin(async move {
            let mut book = self.book.lock().unwrap();
            book.list_calls += 1;
            if book.fail_list {
                return Err(DoubleError("calendar list failed".to_string()));
            }
            let mut reserved: Vec<ReservedInterval> = book
                .events
                .iter()
                .filter(|e| e.status != EventStatus::Cancelled)
                .map(|e| ReservedInterval::new(e.event.start, e.event.end))
                .chain(book.external.iter().copied())
                .filter(|r| r.start < time_max && r.end > time_min)
                .collect();
            reserved.sort_by_key(|r| r.start);
            Ok(reserved)
        })
    }

    fn insert_event(
        &self,
        _calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            let mut book = self.book.lock().unwrap();
            if book.fail_insert {
                return Err(DoubleError("calendar insert failed".to_string()));
            }
            let id = format!("evt_{}", uuid::Uuid::new_v4().simple());
            book.events.push(StoredEvent {
                id: id.clone(),
                status: event.status,
                event,
            });
            Ok(CalendarEventResult {
                event_id: id,
                status: EventStatus::Tentative.to_string(),
            })
        })
    }

    fn confirm_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let mut book = self.book.lock().unwrap();
            if book.fail_confirm {
                return Err(DoubleError("calendar patch failed".to_string()));
            }
            let stored = book
                .events
                .iter_mut()
                .find(|e| e.id == event_id)
                .ok_or_else(|| DoubleError(format!("no event {}", event_id)))?;
            stored.status = EventStatus::Confirmed;
            Ok(CalendarEventResult {
                event_id,
                status: EventStatus::Confirmed.to_string(),
            })
        })
    }

    fn delete_event(&self, _calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let mut book = self.book.lock().unwrap();
            book.events.retain(|e| e.id != event_id);
            book.deleted.push(event_id);
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct PaymentLedger {
    pub requests: Vec<CheckoutRequest>,
    pub fail_checkout: bool,
    /// Event handed out for a request signed with [`GOOD_SIGNATURE`].
    pub next_event: Option<PaymentEvent>,
}

#[derive(Clone, Default)]
pub struct FakePayments {
    pub ledger: Arc<Mutex<PaymentLedger>>,
}

impl FakePayments {
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.ledger.lock().unwrap().requests.clone()
    }

    pub fn script(&self, event: PaymentEvent) {
        self.ledger.lock().unwrap().next_event = Some(event);
    }
}

impl PaymentService for FakePayments {
    type Error = DoubleError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(async move {
            let mut ledger = self.ledger.lock().unwrap();
            if ledger.fail_checkout {
                return Err(DoubleError("stripe unreachable".to_string()));
            }
            let session_id = format!("cs_test_{}", ledger.requests.len() + 1);
            ledger.requests.push(request);
            Ok(CheckoutSession {
                url: format!("https://checkout.stripe.com/c/pay/{}", session_id),
                session_id,
            })
        })
    }

    fn parse_webhook_event(
        &self,
        _payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, WebhookError> {
        if signature_header != GOOD_SIGNATURE {
            return Err(WebhookError::SignatureInvalid(
                "No signatures found matching the expected signature for payload".to_string(),
            ));
        }
        self.ledger
            .lock()
            .unwrap()
            .next_event
            .clone()
            .ok_or_else(|| WebhookError::Payload("no scripted event".to_string()))
    }
}

pub fn stripe_config() -> StripeConfig {
    StripeConfig {
        secret_key: "sk_test_1".to_string(),
        webhook_secret: "whsec_1".to_string(),
        success_url: "https://theoaka.com/#booked".to_string(),
        cancel_url: "https://theoaka.com/#cancel".to_string(),
        default_currency: "usd".to_string(),
        unit_amount: 15000,
        product_name: "Punch In Showcase Booking".to_string(),
        webhook_tolerance_seconds: 300,
    }
}

/// The weekly Punch In schedule in Chicago.
pub fn punch_in_availability() -> AvailabilityConfig {
    let rule = |day, start: &str, end: &str| slotbook_config::RuleConfig {
        day,
        start: start.to_string(),
        end: end.to_string(),
    };
    AvailabilityConfig {
        rules: vec![
            rule(1, "23:00", "24:00"),
            rule(3, "23:00", "24:00"),
            rule(4, "23:00", "24:00"),
            rule(0, "16:00", "19:00"),
        ],
        ..AvailabilityConfig::default()
    }
}

/// Open all day in UTC, so slots always exist relative to wall-clock now.
pub fn always_open_availability() -> AvailabilityConfig {
    AvailabilityConfig {
        time_zone: "UTC".to_string(),
        horizon_days: 2,
        daily_window: Some(DailyWindowConfig {
            start: "00:00".to_string(),
            end: "24:00".to_string(),
        }),
        ..AvailabilityConfig::default()
    }
}

pub fn app_config(availability: AvailabilityConfig) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        use_gcal: true,
        use_stripe: true,
        logging: LoggingConfig::default(),
        availability,
        gcal: Some(GcalConfig {
            calendar_id: "bookings@example.com".to_string(),
            key_path: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
        }),
        stripe: Some(stripe_config()),
    }
}

pub struct Harness {
    pub state: Arc<BookingState>,
    pub calendar: InMemoryCalendar,
    pub payments: FakePayments,
}

pub fn harness_with(config: AppConfig) -> Harness {
    let calendar = InMemoryCalendar::default();
    let payments = FakePayments::default();
    let state = BookingState::new(
        Arc::new(config),
        Some(erase_calendar(calendar.clone())),
        Some(erase_payment(payments.clone())),
    )
    .unwrap();
    Harness {
        state: Arc::new(state),
        calendar,
        payments,
    }
}

pub fn harness(availability: AvailabilityConfig) -> Harness {
    harness_with(app_config(availability))
}
