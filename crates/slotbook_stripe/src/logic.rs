// --- File: crates/slotbook_stripe/src/logic.rs ---
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use slotbook_common::services::{
    CheckoutRequest, CheckoutSession, PaymentEvent, BOOKING_REF_METADATA_KEY,
};
use slotbook_common::HTTP_CLIENT;
use slotbook_config::StripeConfig;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::StripeError;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

type HmacSha256 = Hmac<Sha256>;

// --- Data Structures ---

#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

/// The `data` field of a Stripe event.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEventData {
    /// Shape depends on the event type.
    pub object: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeEvent {
    pub id: String,
    pub created: i64,
    pub livemode: bool,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

/// `data.object` for `checkout.session.*` events. Only the fields booking reads.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeCheckoutSessionObject {
    pub id: String,
    pub metadata: Option<HashMap<String, String>>,
    pub payment_status: Option<String>, // "paid", "unpaid", "no_payment_required"
    pub status: Option<String>,         // "open", "complete", "expired"
    pub client_reference_id: Option<String>,
}

impl StripeCheckoutSessionObject {
    /// Held calendar event id, from metadata first, then `client_reference_id`.
    pub fn booking_ref(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(BOOKING_REF_METADATA_KEY))
            .or(self.client_reference_id.as_ref())
            .filter(|r| !r.is_empty())
            .cloned()
    }

    pub fn is_paid(&self) -> bool {
        matches!(
            self.payment_status.as_deref(),
            Some("paid") | Some("no_payment_required")
        )
    }
}

// --- Checkout ---

/// Form fields for `POST /v1/checkout/sessions`.
pub fn checkout_form_body(request: &CheckoutRequest) -> Vec<(String, String)> {
    let item = &request.line_item;
    let mut form_body: Vec<(String, String)> = vec![
        ("payment_method_types[]".to_string(), "card".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            item.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            item.name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            item.unit_amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
    ];
    if let Some(email) = &request.customer_email {
        form_body.push(("customer_email".to_string(), email.clone()));
    }
    if let Some(client_ref_id) = &request.client_reference_id {
        form_body.push(("client_reference_id".to_string(), client_ref_id.clone()));
    }
    if let Some(expires_at) = request.expires_at {
        form_body.push(("expires_at".to_string(), expires_at.timestamp().to_string()));
    }
    for (key, value) in &request.metadata {
        form_body.push((format!("metadata[{}]", key), value.clone()));
    }
    form_body
}

fn stripe_error_message(body_text: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body_text) {
        Ok(json_body) => json_body
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(body_text),
        Err(_) => body_text,
    }
}

pub async fn create_checkout_session(
    stripe_config: &StripeConfig,
    api_base: &str,
    request: &CheckoutRequest,
) -> Result<CheckoutSession, StripeError> {
    let api_url = format!("{}/v1/checkout/sessions", api_base.trim_end_matches('/'));
    let form_body = checkout_form_body(request);
    info!("Creating Stripe checkout session for '{}'", request.line_item.name);

    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(&stripe_config.secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;
    debug!("Stripe API response status: {}", status);

    if !status.is_success() {
        let message = stripe_error_message(body_text);
        warn!("Stripe checkout creation failed with {}: {}", status, message);
        return Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message,
        });
    }

    let stripe_response: StripeCheckoutSessionApiResponse = serde_json::from_str(&body_text)?;
    let url = stripe_response.url.ok_or(StripeError::MissingCheckoutUrl)?;
    info!("Stripe checkout session {} created", stripe_response.id);
    Ok(CheckoutSession {
        session_id: stripe_response.id,
        url,
    })
}

// --- Webhooks ---

/// Computes the `v1` signature Stripe sends for `payload` signed at `timestamp`.
pub fn compute_signature(payload: &[u8], timestamp: &str, secret: &str) -> Result<String, StripeError> {
    let mac = signing_mac(payload, timestamp, secret)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signing_mac(payload: &[u8], timestamp: &str, secret: &str) -> Result<HmacSha256, StripeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verifies a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=<hex>…]`).
///
/// Any one matching `v1` signature is accepted. When `tolerance_seconds` is positive the
/// timestamp must lie within that distance of `now_unix`.
pub fn verify_stripe_signature(
    payload_bytes: &[u8],
    sig_header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now_unix: i64,
) -> Result<(), StripeError> {
    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();

    for item in sig_header.split(',') {
        if let Some((key, value)) = item.trim().split_once('=') {
            match key {
                "t" => timestamp_str = Some(value),
                "v1" => v1_signatures_hex.push(value),
                _ => {} // v0 and future schemes
            }
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        StripeError::WebhookSignatureError(
            "Invalid timestamp format in Stripe-Signature".to_string(),
        )
    })?;
    if v1_signatures_hex.is_empty() {
        return Err(StripeError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }

    if tolerance_seconds > 0 {
        let age = now_unix
            .checked_sub(parsed_timestamp)
            .map(i64::unsigned_abs)
            .unwrap_or(u64::MAX);
        if age > tolerance_seconds.unsigned_abs() {
            warn!(
                "Rejecting Stripe webhook signed at {} (now {})",
                parsed_timestamp, now_unix
            );
            return Err(StripeError::WebhookSignatureError(
                "Timestamp outside tolerance".to_string(),
            ));
        }
    }

    let mac = signing_mac(payload_bytes, timestamp_str, secret)?;
    let matched = v1_signatures_hex.iter().any(|provided_hex| {
        hex::decode(provided_hex)
            .map(|provided| mac.clone().verify_slice(&provided).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        warn!("Stripe signature mismatch");
        Err(StripeError::WebhookSignatureError(
            "No signatures found matching the expected signature for payload".to_string(),
        ))
    }
}

/// Verifies and decodes a webhook body.
pub fn construct_event(
    payload_bytes: &[u8],
    sig_header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now_unix: i64,
) -> Result<StripeEvent, StripeError> {
    verify_stripe_signature(payload_bytes, sig_header, secret, tolerance_seconds, now_unix)?;
    Ok(serde_json::from_slice(payload_bytes)?)
}

/// Reduces a Stripe event to the booking-relevant [`PaymentEvent`].
pub fn to_payment_event(event: &StripeEvent) -> Result<PaymentEvent, StripeError> {
    match event.event_type.as_str() {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            let session: StripeCheckoutSessionObject =
                serde_json::from_value(event.data.object.clone())?;
            Ok(PaymentEvent::CheckoutCompleted {
                booking_ref: session.booking_ref(),
                paid: session.is_paid(),
                session_id: session.id,
            })
        }
        "checkout.session.expired" | "checkout.session.async_payment_failed" => {
            let session: StripeCheckoutSessionObject =
                serde_json::from_value(event.data.object.clone())?;
            Ok(PaymentEvent::CheckoutExpired {
                booking_ref: session.booking_ref(),
                session_id: session.id,
            })
        }
        other => Ok(PaymentEvent::Other {
            event_type: other.to_string(),
        }),
    }
}
