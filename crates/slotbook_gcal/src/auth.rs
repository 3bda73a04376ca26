// File: crates/slotbook_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        authorized_user::AuthorizedUserSecret, read_service_account_key,
        AuthorizedUserAuthenticator, ServiceAccountAuthenticator,
    },
    CalendarHub,
};
use slotbook_config::{env_vars::is_unresolved_secret, GcalConfig};
use std::{error::Error, path::Path};
use tracing::info;

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// How the hub authenticates against Google.
#[derive(Debug, Clone)]
pub enum GcalCredentials {
    ServiceAccount { key_path: String },
    AuthorizedUser(AuthorizedUserSecret),
}

// An unresolved "secret_from_env" marker counts as missing.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !is_unresolved_secret(v))
        .map(str::to_string)
}

/// Picks credentials from config. A service account key wins over OAuth user credentials.
pub fn credentials_from_config(
    config: &GcalConfig,
) -> Result<GcalCredentials, Box<dyn Error + Send + Sync>> {
    if let Some(key_path) = present(&config.key_path) {
        return Ok(GcalCredentials::ServiceAccount { key_path });
    }
    match (
        present(&config.client_id),
        present(&config.client_secret),
        present(&config.refresh_token),
    ) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => {
            Ok(GcalCredentials::AuthorizedUser(AuthorizedUserSecret {
                client_id,
                client_secret,
                refresh_token,
                key_type: "authorized_user".to_string(),
            }))
        }
        _ => Err("gcal needs key_path, or client_id, client_secret and refresh_token".into()),
    }
}

pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let hub = match credentials_from_config(config)? {
        GcalCredentials::ServiceAccount { key_path } => {
            info!("Authenticating to Google Calendar with service account key {}", key_path);
            let sa_key = read_service_account_key(Path::new(&key_path)).await?;
            let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;
            CalendarHub::new(client, auth)
        }
        GcalCredentials::AuthorizedUser(secret) => {
            info!("Authenticating to Google Calendar with OAuth refresh token");
            let auth = AuthorizedUserAuthenticator::builder(secret).build().await?;
            CalendarHub::new(client, auth)
        }
    };

    Ok(hub)
}
