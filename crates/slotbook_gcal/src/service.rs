// --- File: crates/slotbook_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use google_calendar3::api::Event;
use slotbook_common::services::{
    BoxFuture, CalendarEventResult, CalendarService, EventStatus, NewCalendarEvent,
};
use slotbook_slots::ReservedInterval;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::HubType;
use crate::logic::{event_from_booking, is_gone, reserved_interval_from_event};

// Google caps events.list pages at 2500 items.
const PAGE_SIZE: i32 = 250;
const MAX_PAGES: usize = 40;

#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Google Calendar returned an event without an id")]
    MissingEventId,
}

pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    time_zone: Tz,
}

impl GoogleCalendarService {
    /// `time_zone` is used for all-day events and written onto new events.
    pub fn new(calendar_hub: Arc<HubType>, time_zone: Tz) -> Self {
        Self {
            calendar_hub,
            time_zone,
        }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    fn list_reserved(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<ReservedInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let tz = self.time_zone;

        Box::pin(async move {
            let mut reserved = Vec::new();
            let mut page_token: Option<String> = None;

            for _ in 0..MAX_PAGES {
                let mut call = calendar_hub
                    .events()
                    .list(&calendar_id)
                    .time_min(time_min)
                    .time_max(time_max)
                    .single_events(true)
                    .order_by("startTime")
                    .max_results(PAGE_SIZE);
                if let Some(token) = page_token.as_deref() {
                    call = call.page_token(token);
                }
                let (_response, events) = call.doit().await?;

                let items: Vec<Event> = events.items.unwrap_or_default();
                debug!("events.list page returned {} items", items.len());
                reserved.extend(
                    items
                        .iter()
                        .filter_map(|event| reserved_interval_from_event(event, tz)),
                );

                page_token = events.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }
            if page_token.is_some() {
                warn!(
                    "Stopped listing {} after {} pages, availability may be incomplete",
                    calendar_id, MAX_PAGES
                );
            }

            reserved.sort_by_key(|r| r.start);
            Ok(reserved)
        })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let new_event = event_from_booking(&event, self.time_zone);

        Box::pin(async move {
            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .send_updates("none")
                .doit()
                .await?;

            let event_id = created_event.id.ok_or(GcalServiceError::MissingEventId)?;
            info!("Created {} event {} on {}", event.status, event_id, calendar_id);
            Ok(CalendarEventResult {
                event_id,
                status: created_event
                    .status
                    .unwrap_or_else(|| event.status.to_string()),
            })
        })
    }

    fn confirm_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let patch = Event {
                status: Some(EventStatus::Confirmed.to_string()),
                ..Default::default()
            };

            // Attendees get their invitation once the slot is actually paid for.
            let (_response, updated) = calendar_hub
                .events()
                .patch(patch, &calendar_id, &event_id)
                .send_updates("all")
                .doit()
                .await?;

            info!("Confirmed event {} on {}", event_id, calendar_id);
            Ok(CalendarEventResult {
                event_id: updated.id.unwrap_or(event_id),
                status: updated
                    .status
                    .unwrap_or_else(|| EventStatus::Confirmed.to_string()),
            })
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let result = calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await;

            match result {
                Ok(_) => {
                    info!("Deleted event {} on {}", event_id, calendar_id);
                    Ok(())
                }
                Err(err) if is_gone(&err) => {
                    debug!("Event {} was already gone", event_id);
                    Ok(())
                }
                Err(err) => Err(GcalServiceError::ApiError(err)),
            }
        })
    }
}
