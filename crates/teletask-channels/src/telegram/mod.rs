//! Telegram Bot API channel.
//!
//! Private chats only. Updates arrive through `getUpdates` long polling;
//! replies go out through `sendMessage` with the reply keyboard attached.
//! Docs: <https://core.telegram.org/bots/api>

mod polling;
pub(crate) mod send;
pub(crate) mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;
use teletask_core::config::TelegramConfig;
use tokio::sync::Mutex;

/// Public Bot API server.
pub const API_BASE: &str = "https://api.telegram.org";

/// Extra time the HTTP client waits on top of the long-poll window, so an
/// empty poll ends on Telegram's side and not as a client timeout.
const POLL_GRACE: Duration = Duration::from_secs(5);

/// The task bot's Telegram connection.
pub struct TelegramChannel {
    /// `poll_timeout_secs` is the `getUpdates` window; the allow-list is
    /// enforced by the gateway, not here.
    config: TelegramConfig,
    client: reqwest::Client,
    /// `{api_base}/bot{token}`; method names are appended to it.
    api: String,
    /// Highest `update_id` handed to the gateway. The next poll asks for
    /// `offset = id + 1`, which also acknowledges everything up to `id`.
    last_update_id: Arc<Mutex<Option<i64>>>,
}

impl TelegramChannel {
    /// Channel talking to the public Bot API.
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    /// Channel talking to another Bot API server (e.g. a self-hosted
    /// `telegram-bot-api`).
    pub fn with_api_base(config: TelegramConfig, api_base: &str) -> Self {
        let api = format!("{}/bot{}", api_base.trim_end_matches('/'), config.bot_token);
        Self {
            config,
            client: reqwest::Client::new(),
            api,
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api)
    }
}

/// `getUpdates` URL for one long poll.
pub(crate) fn updates_url(api: &str, poll_timeout_secs: u64, offset: Option<i64>) -> String {
    match offset {
        Some(off) => format!("{api}/getUpdates?timeout={poll_timeout_secs}&offset={off}"),
        None => format!("{api}/getUpdates?timeout={poll_timeout_secs}"),
    }
}

/// HTTP timeout for one long poll.
pub(crate) fn poll_request_timeout(poll_timeout_secs: u64) -> Duration {
    Duration::from_secs(poll_timeout_secs) + POLL_GRACE
}
