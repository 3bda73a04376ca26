// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for a daily rolling log file. Console only when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// --- Google Calendar Config ---
// Either a service account key file or an OAuth2 authorized user (client id/secret + refresh token).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>, // GOOGLE_CLIENT_SECRET
    #[serde(default)]
    pub refresh_token: Option<String>, // GOOGLE_REFRESH_TOKEN
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

// --- Stripe Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    pub secret_key: String,     // STRIPE_SECRET_KEY
    pub webhook_secret: String, // STRIPE_WEBHOOK_SECRET
    pub success_url: String,
    pub cancel_url: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Price of one booking, in the currency's smallest unit.
    pub unit_amount: i64,
    pub product_name: String,
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_seconds: i64,
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_webhook_tolerance() -> i64 {
    300
}

// --- Availability Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    /// 0 = Sunday … 6 = Saturday
    pub day: u8,
    pub start: String,
    pub end: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DailyWindowConfig {
    pub start: String,
    pub end: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AvailabilityConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_slot_duration_minutes")]
    pub slot_duration_minutes: i64,
    /// How long a tentative hold (and its checkout session) stays open.
    #[serde(default = "default_hold_minutes")]
    pub hold_minutes: i64,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// When set, replaces `rules` with the same window on every day.
    #[serde(default)]
    pub daily_window: Option<DailyWindowConfig>,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            horizon_days: default_horizon_days(),
            slot_duration_minutes: default_slot_duration_minutes(),
            hold_minutes: default_hold_minutes(),
            rules: Vec::new(),
            daily_window: None,
        }
    }
}

fn default_time_zone() -> String {
    "America/Chicago".to_string()
}

fn default_horizon_days() -> u32 {
    14
}

fn default_slot_duration_minutes() -> i64 {
    30
}

// Stripe refuses checkout expiries shorter than 30 minutes.
fn default_hold_minutes() -> i64 {
    30
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_stripe: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,

    // --- Optional Provider Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
}
