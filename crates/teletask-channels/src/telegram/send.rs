//! Message sending and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use serde_json::{json, Value};
use teletask_core::{error::TeletaskError, message::Keyboard};
use tracing::{info, warn};

/// Telegram's hard limit on message length.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a text message to a specific chat.
    ///
    /// Long texts are split; the keyboard rides on the last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TeletaskError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let markup = if i == last { keyboard } else { None };
            let body = send_message_body(chat_id, chunk, markup);

            let resp = self
                .client
                .post(self.method_url("sendMessage"))
                .json(&body)
                .send()
                .await
                .map_err(|e| TeletaskError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(TeletaskError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let url = self.method_url("setMyCommands");
        match self.client.post(&url).json(&bot_commands()).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}

/// JSON body for `sendMessage`. Texts go out as plain text so task
/// descriptions are shown literally.
pub(crate) fn send_message_body(chat_id: i64, text: &str, keyboard: Option<&Keyboard>) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(kb) = keyboard {
        let rows: Vec<Vec<Value>> = kb
            .rows
            .iter()
            .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
            .collect();
        body["reply_markup"] = json!({
            "keyboard": rows,
            "resize_keyboard": true,
        });
    }
    body
}

pub(crate) fn bot_commands() -> Value {
    json!({
        "commands": [
            { "command": "start", "description": "Show the main menu" },
            { "command": "add", "description": "Add a new task" },
            { "command": "done", "description": "Mark a task as done" },
            { "command": "list", "description": "List open tasks" },
            { "command": "done_tasks", "description": "List completed tasks" },
            { "command": "cancel", "description": "Cancel the current action" },
            { "command": "help", "description": "Show available commands" },
        ]
    })
}
