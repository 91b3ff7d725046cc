mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::TeletaskError;
use defaults::*;

/// Environment variable holding the bot credential.
pub const BOT_KEY_ENV: &str = "BOT_KEY";
/// Environment variable holding a comma-separated allow-list.
pub const ALLOWED_USERS_ENV: &str = "ALLOWED_USERS";

/// Top-level Teletask configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub teletask: TeletaskConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Authentication configuration.
///
/// Who is allowed lives in `telegram.allowed_users`; this section only
/// controls what denied senders are told.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Message sent to unauthorized users.
    #[serde(default = "default_deny_message")]
    pub deny_message: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            deny_message: default_deny_message(),
        }
    }
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeletaskConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TeletaskConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Task store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Config {
    /// Apply `BOT_KEY` / `ALLOWED_USERS` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(BOT_KEY_ENV).ok(),
            std::env::var(ALLOWED_USERS_ENV).ok(),
        );
    }

    /// Override the credential and allow-list. `None` leaves the file value.
    pub fn apply_overrides(&mut self, bot_key: Option<String>, allowed_users: Option<String>) {
        if let Some(key) = bot_key.filter(|k| !k.trim().is_empty()) {
            self.telegram.bot_token = key.trim().to_string();
        }
        if let Some(raw) = allowed_users {
            self.telegram.allowed_users = parse_allow_list(&raw);
        }
    }

    /// Fail fast when the bot cannot possibly start.
    pub fn validate(&self) -> Result<(), TeletaskError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(TeletaskError::Config(format!(
                "no bot credential: set telegram.bot_token in config.toml or {BOT_KEY_ENV}"
            )));
        }
        Ok(())
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Create the `data/` and `logs/` subdirectories under `data_dir`.
///
/// Failures are logged, not returned: the store reports its own error if
/// the database directory is really unusable.
pub fn ensure_layout(data_dir: &str) {
    let dir = shellexpand(data_dir);
    let base = Path::new(&dir);
    for sub in &["data", "logs"] {
        if let Err(e) = std::fs::create_dir_all(base.join(sub)) {
            warn!("failed to create {}: {e}", base.join(sub).display());
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Environment overrides
/// are not applied here; see [`Config::apply_env`].
pub fn load(path: &str) -> Result<Config, TeletaskError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TeletaskError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TeletaskError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
