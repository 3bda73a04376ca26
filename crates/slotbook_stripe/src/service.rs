// --- File: crates/slotbook_stripe/src/service.rs ---
use chrono::Utc;
use slotbook_common::services::{
    BoxFuture, CheckoutRequest, CheckoutSession, PaymentEvent, PaymentService, WebhookError,
};
use slotbook_config::{env_vars::is_unresolved_secret, StripeConfig};
use tracing::info;

use crate::error::StripeError;
use crate::logic::{construct_event, create_checkout_session, to_payment_event, STRIPE_API_BASE};

/// Stripe Checkout implementation of [`PaymentService`].
pub struct StripePaymentService {
    config: StripeConfig,
    api_base: String,
}

impl StripePaymentService {
    /// Fails when either key is blank or still the `secret_from_env` placeholder.
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        Self::with_api_base(config, STRIPE_API_BASE)
    }

    /// Points the client at a different API host, e.g. `stripe-mock`.
    pub fn with_api_base(config: StripeConfig, api_base: &str) -> Result<Self, StripeError> {
        for (name, value) in [
            ("stripe.secret_key", &config.secret_key),
            ("stripe.webhook_secret", &config.webhook_secret),
        ] {
            if is_unresolved_secret(value) {
                return Err(StripeError::ConfigError(format!("{} is not set", name)));
            }
        }
        Ok(Self {
            config,
            api_base: api_base.to_string(),
        })
    }
}

impl PaymentService for StripePaymentService {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(async move { create_checkout_session(&self.config, &self.api_base, &request).await })
    }

    fn parse_webhook_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, WebhookError> {
        let event = construct_event(
            payload,
            signature_header,
            &self.config.webhook_secret,
            self.config.webhook_tolerance_seconds,
            Utc::now().timestamp(),
        )
        .map_err(|err| match err {
            StripeError::WebhookSignatureError(msg) => WebhookError::SignatureInvalid(msg),
            other => WebhookError::Payload(other.to_string()),
        })?;

        info!(
            "Verified Stripe event {} ({}, livemode={})",
            event.id, event.event_type, event.livemode
        );
        to_payment_event(&event).map_err(|err| WebhookError::Payload(err.to_string()))
    }
}
