// --- File: crates/slotbook_booking/src/state.rs ---
use slotbook_common::services::{DynCalendarService, DynPaymentService, ServiceFactory};
use slotbook_config::{AppConfig, StripeConfig};
use slotbook_slots::AvailabilityTemplate;
use std::sync::Arc;

use crate::error::BookingError;
use crate::logic::template_from_config;

/// Shared router state. Providers are built once at startup and never swapped.
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub template: AvailabilityTemplate,
    calendar: Option<DynCalendarService>,
    payments: Option<DynPaymentService>,
}

impl BookingState {
    pub fn new(
        config: Arc<AppConfig>,
        calendar: Option<DynCalendarService>,
        payments: Option<DynPaymentService>,
    ) -> Result<Self, BookingError> {
        let template = template_from_config(&config.availability)?;
        Ok(Self {
            config,
            template,
            calendar,
            payments,
        })
    }

    pub fn from_factory(
        config: Arc<AppConfig>,
        factory: &dyn ServiceFactory,
    ) -> Result<Self, BookingError> {
        Self::new(config, factory.calendar_service(), factory.payment_service())
    }

    /// The calendar provider, unless `use_gcal` is off or it was never built.
    pub fn calendar(&self) -> Result<&DynCalendarService, BookingError> {
        match (&self.calendar, self.config.use_gcal) {
            (Some(calendar), true) => Ok(calendar),
            _ => Err(BookingError::Disabled("Calendar")),
        }
    }

    pub fn calendar_id(&self) -> &str {
        self.config
            .gcal
            .as_ref()
            .map(|gcal| gcal.calendar_id.as_str())
            .unwrap_or("primary")
    }

    pub fn payments(&self) -> Result<&DynPaymentService, BookingError> {
        match (&self.payments, self.config.use_stripe) {
            (Some(payments), true) => Ok(payments),
            _ => Err(BookingError::Disabled("Payment")),
        }
    }

    /// Price and redirect settings for checkout.
    pub fn stripe_config(&self) -> Result<&StripeConfig, BookingError> {
        self.config
            .stripe
            .as_ref()
            .ok_or(BookingError::Disabled("Payment"))
    }
}
