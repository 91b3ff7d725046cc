//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate};
use super::{poll_request_timeout, updates_url, TelegramChannel};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use teletask_core::{
    error::TeletaskError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, TeletaskError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let api = self.api.clone();
        let poll_timeout = self.config.poll_timeout_secs;
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let url = updates_url(&api, poll_timeout, offset);

                let resp = match client
                    .get(&url)
                    .timeout(poll_request_timeout(poll_timeout))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(incoming) = to_incoming(update) else {
                        continue;
                    };
                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TeletaskError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| TeletaskError::Channel("no reply_target on outgoing message".into()))?;

        let chat_id: i64 = chat_id_str.parse().map_err(|e| {
            TeletaskError::Channel(format!("invalid telegram chat_id '{chat_id_str}': {e}"))
        })?;

        self.send_text(chat_id, &message.text, message.keyboard.as_ref())
            .await
    }

    async fn stop(&self) -> Result<(), TeletaskError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Turn a raw update into an `IncomingMessage`.
///
/// Returns `None` for anything the bot does not handle: non-message updates,
/// messages without text or sender, and group chats.
pub(crate) fn to_incoming(update: TgUpdate) -> Option<IncomingMessage> {
    let msg = update.message?;
    let text = msg.text?;
    let user = msg.from?;

    if msg.chat.is_group() {
        debug!("telegram: ignoring group message from chat {}", msg.chat.id);
        return None;
    }

    let timestamp = DateTime::<Utc>::from_timestamp(msg.date, 0)
        .filter(|_| msg.date > 0)
        .unwrap_or_else(Utc::now);

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(user.display_name()),
        text,
        timestamp,
        reply_target: Some(msg.chat.id.to_string()),
    })
}
