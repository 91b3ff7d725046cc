use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults::default_poll_timeout;

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Telegram user IDs allowed to talk to the bot. Empty = allow all.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
    /// Long-poll timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            allowed_users: Vec::new(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

/// Parse a comma-separated list of user IDs (e.g. `"123, 456"`).
///
/// Blank segments are skipped. If any segment is not an integer the whole
/// list is rejected with a warning and an empty (unrestricted) list is
/// returned.
pub fn parse_allow_list(raw: &str) -> Vec<i64> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<i64>() {
            Ok(id) => ids.push(id),
            Err(e) => {
                warn!(
                    "ignoring allow-list {raw:?}: {part:?} is not a user id ({e}); \
                     the bot is open to everyone"
                );
                return Vec::new();
            }
        }
    }
    ids
}
