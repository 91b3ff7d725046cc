//! Gateway: the main event loop connecting channels, the conversation
//! controller, and the task store.
//!
//! Includes: auth enforcement, per-sender serialization, audit logging,
//! and graceful shutdown.

mod auth;
mod pipeline;


use crate::conversation::Conversations;
use std::collections::HashMap;
use std::sync::Arc;
use teletask_core::{
    config::AuthConfig,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use teletask_store::{AuditLogger, Store};
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

/// The central gateway that routes messages between channels and the bot core.
pub struct Gateway {
    pub(super) channels: HashMap<String, Arc<dyn Channel>>,
    pub(super) store: Store,
    pub(super) audit: AuditLogger,
    pub(super) auth_config: AuthConfig,
    /// Telegram user IDs allowed to use the bot. Empty = everyone.
    pub(super) allowed_users: Vec<i64>,
    pub(super) bot_name: String,
    pub(super) conversations: Conversations,
    /// Senders with a message being handled. Further messages from the same
    /// sender queue here so one session never runs two steps at once.
    pub(super) active_senders: Mutex<HashMap<String, Vec<IncomingMessage>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        store: Store,
        auth_config: AuthConfig,
        allowed_users: Vec<i64>,
        bot_name: String,
    ) -> Self {
        let audit = AuditLogger::new(store.pool().clone());
        Self {
            channels,
            store,
            audit,
            auth_config,
            allowed_users,
            bot_name,
            conversations: Conversations::new(),
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Teletask gateway running | channels: {} | auth: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            if self.allowed_users.is_empty() {
                "open to everyone".to_string()
            } else {
                format!("{} allowed users", self.allowed_users.len())
            },
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        loop {
            tokio::select! {
                incoming = rx.recv() => {
                    let Some(incoming) = incoming else {
                        warn!("all channels closed");
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Dispatch a message: queue it if the sender is busy, otherwise process
    /// it and then drain whatever queued up meanwhile.
    pub(super) async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let sender_key = session_key(&incoming);

        {
            let mut active = self.active_senders.lock().await;
            if let Some(buffer) = active.get_mut(&sender_key) {
                buffer.push(incoming);
                info!("queued message from {sender_key} (previous one still running)");
                return;
            }
            active.insert(sender_key.clone(), Vec::new());
        }

        self.handle_isolated(&sender_key, incoming).await;

        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender_key) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        active.remove(&sender_key);
                        None
                    }
                }
            };

            match next {
                Some(queued) => self.handle_isolated(&sender_key, queued).await,
                None => break,
            }
        }
    }

    /// Run `handle_message` on its own task. A panic there is logged and
    /// the sender's queue keeps draining.
    async fn handle_isolated(self: &Arc<Self>, sender_key: &str, incoming: IncomingMessage) {
        let gw = self.clone();
        if let Err(e) = tokio::spawn(async move { gw.handle_message(incoming).await }).await {
            error!("message handler for {sender_key} failed: {e}");
        }
    }

    /// Graceful shutdown: stop channels and report abandoned flows.
    async fn shutdown(&self) {
        info!("Shutting down...");

        let abandoned = self.conversations.active_count();
        if abandoned > 0 {
            info!("{abandoned} unfinished conversation(s) dropped");
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        self.store.pool().close().await;
        info!("Shutdown complete.");
    }

    /// Send a reply back through the channel the message came from.
    pub(super) async fn send(&self, incoming: &IncomingMessage, message: OutgoingMessage) {
        let Some(channel) = self.channels.get(&incoming.channel) else {
            error!("no channel named {} to reply on", incoming.channel);
            return;
        };
        if let Err(e) = channel.send(message).await {
            error!("failed to send reply to {}: {e}", incoming.sender_id);
        }
    }
}

/// Session identity: one conversation per sender per channel.
pub(super) fn session_key(incoming: &IncomingMessage) -> String {
    format!("{}:{}", incoming.channel, incoming.sender_id)
}
