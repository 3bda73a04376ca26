//! Environment variable naming for Slotbook configuration.
//!
//! Plain settings are overridden through `SLOTBOOK__SECTION__KEY`. Values written as
//! `"secret_from_env"` in a config file are resolved from `SLOTBOOK_SECRET_SECTION_KEY`, falling
//! back to the short names the service has always used (`STRIPE_SECRET_KEY`,
//! `GOOGLE_REFRESH_TOKEN`, …).

use serde_json::Value;
use std::env;

pub const DEFAULT_PREFIX: &str = "SLOTBOOK";

pub const SECRET_PREFIX: &str = "SLOTBOOK_SECRET";

pub const CONFIG_SEPARATOR: &str = "__";

pub const SECRET_SEPARATOR: &str = "_";

/// Marker replaced by an environment variable at load time.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Whether a secret is blank or still the unresolved [`SECRET_MARKER`].
pub fn is_unresolved_secret(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == SECRET_MARKER
}

/// Prefix for configuration environment variables, overridable via `PREFIX`.
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// `server.host` -> `SLOTBOOK__SERVER__HOST`
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// `stripe.secret_key` -> `SLOTBOOK_SECRET_STRIPE_SECRET_KEY`
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

// Config sections whose legacy variables use a different service name.
fn legacy_service_name(section: &str) -> &str {
    match section {
        "gcal" => "google",
        other => other,
    }
}

/// `stripe.secret_key` -> `STRIPE_SECRET_KEY`, `gcal.client_id` -> `GOOGLE_CLIENT_ID`
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = legacy_service_name(parts[0]);
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Resolves a marked value: secret name first, then the legacy name, then the plain
/// configuration name.
pub fn get_env_var(path: &str) -> Option<String> {
    [
        secret_path_to_env_var(path),
        legacy_secret_path_to_env_var(path),
        config_path_to_env_var(path),
    ]
    .iter()
    .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))
}

/// Replaces every `"secret_from_env"` string in `value` and returns the dotted paths that
/// could not be resolved.
pub fn inject_env_vars(value: &mut Value) -> Vec<String> {
    fn walk(path: &mut Vec<String>, obj: &mut Value, unresolved: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, unresolved);
                    path.pop();
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    path.push(i.to_string());
                    walk(path, v, unresolved);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match get_env_var(&path_str) {
                    Some(env_val) => *s = env_val,
                    None => unresolved.push(path_str),
                }
            }
            _ => {}
        }
    }

    let mut unresolved = Vec::new();
    walk(&mut Vec::new(), value, &mut unresolved);
    unresolved
}
