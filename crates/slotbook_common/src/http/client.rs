// --- File: crates/slotbook_common/src/http/client.rs ---
use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared client for outbound provider calls.
///
/// Falls back to reqwest's default client if the configured builder cannot be constructed.
pub static HTTP_CLIENT: Lazy<Client> =
    Lazy::new(|| create_client(DEFAULT_TIMEOUT_SECS).unwrap_or_default());

pub fn create_client(timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("slotbook/", env!("CARGO_PKG_VERSION")))
        .build()
}
