// --- File: crates/slotbook_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads configuration from `config/default`, `config/{RUN_ENV}` and `SLOTBOOK__*` variables.
///
/// The directory defaults to `./config` and can be moved with `SLOTBOOK_CONFIG_DIR`. A bare
/// `PORT` variable overrides `server.port`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let config_dir = env::var("SLOTBOOK_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    load_config_from(&config_dir)
}

pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let mut config = apply_env_overrides_from_marker(raw_config)?;

    if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    Ok(config)
}

/// Resolves every `"secret_from_env"` marker in `config`.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    // Logging is not up yet when configuration loads.
    for path in env_vars::inject_env_vars(&mut json) {
        eprintln!("Warning: env var for {} not found", path);
    }
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads `.env` (or the file named by `DOTENV_OVERRIDE`, or a first CLI argument starting with
/// `.env`) exactly once and returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
