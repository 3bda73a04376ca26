// --- File: crates/slotbook_booking/src/logic.rs ---
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use slotbook_common::services::{
    CheckoutRequest, EventStatus, LineItem, NewCalendarEvent, PaymentEvent,
    BOOKING_REF_METADATA_KEY,
};
use slotbook_config::AvailabilityConfig;
use slotbook_slots::{
    available_slots, candidate_window, generate_candidates, offered_slot, parse_time_zone,
    AvailabilityRule, AvailabilityTemplate, AvailableSlotList, Slot, TemplateError, TimeOfDay,
};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::BookingError;
use crate::state::BookingState;

// Stripe accepts checkout expiries between 30 minutes and 24 hours after creation.
const MIN_CHECKOUT_EXPIRY_MINUTES: i64 = 30;
const MAX_CHECKOUT_EXPIRY_MINUTES: i64 = 24 * 60;
// Room for the time between computing expires_at and Stripe creating the session.
const EXPIRY_SLACK_MINUTES: i64 = 1;

const MAX_NAME_LEN: usize = 200;

// --- Request / Response Structs ---

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotSelection {
    /// RFC 3339 start, e.g. `2025-06-09T23:00:00Z`
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub slot: Option<SlotSelection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    /// Hosted checkout page to redirect the customer to.
    pub url: String,
    pub session_id: String,
    /// Id of the tentative calendar event holding the slot.
    pub event_id: String,
}

/// What a verified webhook did to the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Confirmed { event_id: String },
    Released { event_id: String },
    Ignored,
}

/// A booking request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub name: String,
    pub email: String,
    pub slot: Slot,
}

// --- Configuration ---

/// Builds the weekly template. `daily_window`, when set, replaces the per-day rules.
pub fn template_from_config(
    config: &AvailabilityConfig,
) -> Result<AvailabilityTemplate, TemplateError> {
    let tz = parse_time_zone(&config.time_zone)?;
    if let Some(window) = &config.daily_window {
        let start: TimeOfDay = window.start.parse()?;
        let end: TimeOfDay = window.end.parse()?;
        return AvailabilityTemplate::daily(tz, start, end);
    }
    let rules = config
        .rules
        .iter()
        .map(|rule| AvailabilityRule::parse(rule.day, &rule.start, &rule.end))
        .collect::<Result<Vec<_>, _>>()?;
    AvailabilityTemplate::new(tz, rules)
}

pub fn slot_duration(config: &AvailabilityConfig) -> Duration {
    Duration::minutes(config.slot_duration_minutes)
}

/// When the checkout session (and so the hold) lapses, clamped to what Stripe accepts.
pub fn checkout_expiry(now: DateTime<Utc>, hold_minutes: i64) -> DateTime<Utc> {
    let minutes = hold_minutes.clamp(
        MIN_CHECKOUT_EXPIRY_MINUTES + EXPIRY_SLACK_MINUTES,
        MAX_CHECKOUT_EXPIRY_MINUTES - EXPIRY_SLACK_MINUTES,
    );
    now + Duration::minutes(minutes)
}

// --- Validation ---

/// One `@`, something before it, a dotted domain after it and no whitespace.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, BookingError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| BookingError::Validation(format!("Invalid slot.{} (expected RFC 3339)", field)))
}

pub fn validate_booking(
    template: &AvailabilityTemplate,
    config: &AvailabilityConfig,
    request: &BookSlotRequest,
    now: DateTime<Utc>,
) -> Result<ValidBooking, BookingError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(BookingError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(BookingError::Validation("name is too long".to_string()));
    }
    let email = request.email.trim();
    if !is_plausible_email(email) {
        return Err(BookingError::Validation("email is not a valid address".to_string()));
    }
    let selection = request
        .slot
        .as_ref()
        .ok_or_else(|| BookingError::Validation("slot is required".to_string()))?;
    let start = parse_instant("start", &selection.start)?;
    let end = parse_instant("end", &selection.end)?;

    if start <= now {
        return Err(BookingError::Validation("Slot has already started".to_string()));
    }
    let duration = slot_duration(config);
    let slot = offered_slot(template, duration, start)
        .ok_or_else(|| BookingError::Validation("Slot is not offered".to_string()))?;
    if slot.end != end {
        return Err(BookingError::Validation(format!(
            "Slot end must be {}",
            slot.end.to_rfc3339()
        )));
    }
    let horizon = generate_candidates(template, config.horizon_days, duration, now);
    if !horizon.contains(&slot) {
        return Err(BookingError::Validation(format!(
            "Slot is beyond the {} day booking horizon",
            config.horizon_days
        )));
    }

    Ok(ValidBooking {
        name: name.to_string(),
        email: email.to_string(),
        slot,
    })
}

// --- Operations ---

/// Free slots from `now` to the end of the horizon.
pub async fn list_available_slots(
    state: &BookingState,
    now: DateTime<Utc>,
) -> Result<AvailableSlotList, BookingError> {
    let calendar = state.calendar()?;
    let availability = &state.config.availability;
    let duration = slot_duration(availability);

    let horizon_end = now + Duration::days(i64::from(availability.horizon_days));
    let candidates = generate_candidates(&state.template, availability.horizon_days, duration, now);
    let time_max = match candidate_window(&candidates) {
        Some((_, last_end)) if last_end > horizon_end => last_end,
        _ => horizon_end,
    };

    let reserved = calendar
        .list_reserved(state.calendar_id(), now, time_max)
        .await
        .map_err(BookingError::Calendar)?;

    Ok(available_slots(
        &state.template,
        availability.horizon_days,
        duration,
        &reserved,
        now,
    ))
}

/// Holds the slot with a tentative event, then opens a checkout session for it.
///
/// A failed checkout deletes the hold again before the error is returned.
pub async fn book_slot(
    state: &BookingState,
    request: BookSlotRequest,
    now: DateTime<Utc>,
) -> Result<BookingResponse, BookingError> {
    let calendar = state.calendar()?;
    let payments = state.payments()?;
    let stripe = state.stripe_config()?;
    let calendar_id = state.calendar_id();

    let booking = validate_booking(&state.template, &state.config.availability, &request, now)?;
    let slot = booking.slot;

    let reserved = calendar
        .list_reserved(calendar_id, slot.start, slot.end)
        .await
        .map_err(BookingError::Calendar)?;
    if reserved.iter().any(|r| slot.conflicts_with(r)) {
        info!("Slot {} is already taken", slot.start);
        return Err(BookingError::SlotTaken);
    }

    let hold = calendar
        .insert_event(
            calendar_id,
            NewCalendarEvent {
                summary: format!("{}: {}", stripe.product_name, booking.name),
                description: Some(format!(
                    "Booked by {} <{}>. Awaiting payment.",
                    booking.name, booking.email
                )),
                start: slot.start,
                end: slot.end,
                attendee_emails: vec![booking.email.clone()],
                status: EventStatus::Tentative,
            },
        )
        .await
        .map_err(BookingError::Calendar)?;
    info!("Holding {} with tentative event {}", slot.start, hold.event_id);

    let mut metadata = BTreeMap::new();
    metadata.insert(BOOKING_REF_METADATA_KEY.to_string(), hold.event_id.clone());
    let checkout = CheckoutRequest {
        line_item: LineItem {
            name: stripe.product_name.clone(),
            unit_amount_cents: stripe.unit_amount,
            currency: stripe.default_currency.clone(),
            quantity: 1,
        },
        success_url: stripe.success_url.clone(),
        cancel_url: stripe.cancel_url.clone(),
        customer_email: Some(booking.email.clone()),
        client_reference_id: Some(hold.event_id.clone()),
        metadata,
        expires_at: Some(checkout_expiry(now, state.config.availability.hold_minutes)),
    };

    match payments.create_checkout_session(checkout).await {
        Ok(session) => {
            info!(
                "Checkout session {} opened for event {}",
                session.session_id, hold.event_id
            );
            Ok(BookingResponse {
                url: session.url,
                session_id: session.session_id,
                event_id: hold.event_id,
            })
        }
        Err(err) => {
            error!("Checkout creation failed for event {}: {}", hold.event_id, err);
            if let Err(release_err) = calendar.delete_event(calendar_id, &hold.event_id).await {
                error!(
                    "Could not release hold {} after checkout failure: {}",
                    hold.event_id, release_err
                );
            }
            Err(BookingError::Payment(err))
        }
    }
}

/// Applies a verified payment event to the held calendar event.
pub async fn handle_payment_event(
    state: &BookingState,
    event: PaymentEvent,
) -> Result<WebhookOutcome, BookingError> {
    match event {
        PaymentEvent::CheckoutCompleted {
            session_id,
            booking_ref,
            paid,
        } => {
            if !paid {
                info!("Checkout {} completed but payment is still pending", session_id);
                return Ok(WebhookOutcome::Ignored);
            }
            let Some(event_id) = booking_ref else {
                warn!("Checkout {} carries no booking reference", session_id);
                return Ok(WebhookOutcome::Ignored);
            };
            let calendar = state.calendar()?;
            let result = calendar
                .confirm_event(state.calendar_id(), &event_id)
                .await
                .map_err(BookingError::Calendar)?;
            info!("Payment {} confirmed event {}", session_id, result.event_id);
            Ok(WebhookOutcome::Confirmed {
                event_id: result.event_id,
            })
        }
        PaymentEvent::CheckoutExpired {
            session_id,
            booking_ref,
        } => {
            let Some(event_id) = booking_ref else {
                warn!("Expired checkout {} carries no booking reference", session_id);
                return Ok(WebhookOutcome::Ignored);
            };
            let calendar = state.calendar()?;
            calendar
                .delete_event(state.calendar_id(), &event_id)
                .await
                .map_err(BookingError::Calendar)?;
            info!("Checkout {} expired, released event {}", session_id, event_id);
            Ok(WebhookOutcome::Released { event_id })
        }
        PaymentEvent::Other { event_type } => {
            info!("Ignoring payment event {}", event_type);
            Ok(WebhookOutcome::Ignored)
        }
    }
}

/// Verifies the raw webhook body and applies it.
pub async fn process_webhook(
    state: &BookingState,
    payload: &[u8],
    signature_header: Option<&str>,
) -> Result<WebhookOutcome, BookingError> {
    let payments = state.payments()?;
    let signature_header = signature_header
        .ok_or_else(|| BookingError::Signature("Missing Stripe-Signature header".to_string()))?;
    let event = payments
        .parse_webhook_event(payload, signature_header)
        .map_err(|err| {
            warn!("Rejected webhook: {}", err);
            BookingError::from(err)
        })?;
    handle_payment_event(state, event).await
}
