// --- File: crates/slotbook_gcal/src/logic.rs ---
//! Conversions between Google Calendar events and Slotbook types.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventAttendee, EventDateTime};
use slotbook_common::services::NewCalendarEvent;
use slotbook_slots::ReservedInterval;

// Start of a local calendar day as an instant.
fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        // Zones that skip midnight on a DST change start the day at 01:00.
        LocalResult::None => tz
            .from_local_datetime(&date.and_hms_opt(1, 0, 0)?)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn boundary(edge: &EventDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match (edge.date_time, edge.date) {
        (Some(date_time), _) => Some(date_time),
        (None, Some(date)) => local_midnight(date, tz),
        (None, None) => None,
    }
}

/// Busy interval covered by `event`, or `None` when it does not block time.
///
/// Cancelled and transparent ("show as available") events are ignored. All-day events span
/// local midnight to midnight in `tz`; their end date is exclusive.
pub fn reserved_interval_from_event(event: &Event, tz: Tz) -> Option<ReservedInterval> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }
    if event.transparency.as_deref() == Some("transparent") {
        return None;
    }
    let start = boundary(event.start.as_ref()?, tz)?;
    let end = boundary(event.end.as_ref()?, tz)?;
    (end > start).then(|| ReservedInterval::new(start, end))
}

/// Builds the Google event for a booking. Times carry the display zone so the owner's calendar
/// shows them in local time.
pub fn event_from_booking(booking: &NewCalendarEvent, tz: Tz) -> Event {
    let attendees = (!booking.attendee_emails.is_empty()).then(|| {
        booking
            .attendee_emails
            .iter()
            .map(|email| EventAttendee {
                email: Some(email.clone()),
                ..Default::default()
            })
            .collect()
    });

    Event {
        summary: Some(booking.summary.clone()),
        description: booking.description.clone(),
        status: Some(booking.status.as_str().to_string()),
        start: Some(EventDateTime {
            date_time: Some(booking.start),
            time_zone: Some(tz.name().to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(booking.end),
            time_zone: Some(tz.name().to_string()),
            ..Default::default()
        }),
        attendees,
        ..Default::default()
    }
}

/// Whether an API error means the event no longer exists.
pub fn is_gone(err: &google_calendar3::Error) -> bool {
    let gone = |code: u64| code == 404 || code == 410;
    match err {
        google_calendar3::Error::BadRequest(value) => value
            .pointer("/error/code")
            .and_then(|code| code.as_u64())
            .is_some_and(gone),
        google_calendar3::Error::Failure(response) => gone(u64::from(response.status().as_u16())),
        _ => false,
    }
}
