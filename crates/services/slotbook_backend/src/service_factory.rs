// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Builds the calendar and payment providers once at startup.
//!
//! A provider that is switched off, unconfigured, or fails to initialise is left out; the
//! booking routes then answer 503 for the operations that need it.
use slotbook_common::services::{
    erase_calendar, erase_payment, DynCalendarService, DynPaymentService, ServiceFactory,
};
use slotbook_config::AppConfig;
use slotbook_gcal::{create_calendar_hub, GoogleCalendarService};
use slotbook_slots::parse_time_zone;
use slotbook_stripe::StripePaymentService;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct SlotbookServiceFactory {
    calendar_service: Option<DynCalendarService>,
    payment_service: Option<DynPaymentService>,
}

impl SlotbookServiceFactory {
    pub async fn new(config: Arc<AppConfig>) -> Self {
        Self {
            calendar_service: build_calendar(&config).await,
            payment_service: build_payments(&config),
        }
    }
}

async fn build_calendar(config: &AppConfig) -> Option<DynCalendarService> {
    if !config.use_gcal {
        info!("Google Calendar disabled by configuration");
        return None;
    }
    let Some(gcal_config) = config.gcal.as_ref() else {
        warn!("use_gcal is set but the [gcal] section is missing");
        return None;
    };
    let time_zone = match parse_time_zone(&config.availability.time_zone) {
        Ok(tz) => tz,
        Err(err) => {
            error!("Cannot start Google Calendar service: {}", err);
            return None;
        }
    };

    info!("Initializing Google Calendar service for {}", gcal_config.calendar_id);
    match create_calendar_hub(gcal_config).await {
        Ok(hub) => Some(erase_calendar(GoogleCalendarService::new(
            Arc::new(hub),
            time_zone,
        ))),
        Err(err) => {
            error!("Failed to create Google Calendar hub: {}", err);
            None
        }
    }
}

fn build_payments(config: &AppConfig) -> Option<DynPaymentService> {
    if !config.use_stripe {
        info!("Stripe disabled by configuration");
        return None;
    }
    match config.stripe.as_ref() {
        Some(stripe_config) => match StripePaymentService::new(stripe_config.clone()) {
            Ok(service) => {
                info!("Initializing Stripe payment service");
                Some(erase_payment(service))
            }
            Err(err) => {
                error!("Cannot start Stripe payment service: {}", err);
                None
            }
        },
        None => {
            warn!("use_stripe is set but the [stripe] section is missing");
            None
        }
    }
}

impl ServiceFactory for SlotbookServiceFactory {
    fn calendar_service(&self) -> Option<DynCalendarService> {
        self.calendar_service.clone()
    }

    fn payment_service(&self) -> Option<DynPaymentService> {
        self.payment_service.clone()
    }
}
