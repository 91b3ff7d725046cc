//! Message processing pipeline: auth, routing, reply, audit.

use super::{auth::check_auth, session_key, Gateway};
use crate::commands::{self, Command, CommandContext};
use crate::conversation::{Actor, Input};
use crate::replies::{self, Reply};
use teletask_core::{
    error::TeletaskError,
    message::{IncomingMessage, OutgoingMessage},
};
use teletask_store::audit::{AuditEntry, AuditStatus};
use tracing::{error, info, warn};

/// What handling one message produced.
pub(super) struct Outcome {
    pub reply: Reply,
    pub status: AuditStatus,
    pub denial_reason: Option<String>,
}

impl Outcome {
    fn ok(reply: Reply) -> Self {
        Self {
            reply,
            status: AuditStatus::Ok,
            denial_reason: None,
        }
    }

    fn failed(reply: Reply) -> Self {
        Self {
            reply,
            status: AuditStatus::Error,
            denial_reason: None,
        }
    }
}

impl Gateway {
    /// Process a single incoming message through the full pipeline.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.display_name(),
            preview
        );

        let outcome = self.respond(&incoming).await;

        if let Err(e) = self
            .audit
            .log(&AuditEntry {
                channel: incoming.channel.clone(),
                sender_id: incoming.sender_id.clone(),
                sender_name: incoming.sender_name.clone(),
                input_text: incoming.text.clone(),
                output_text: Some(outcome.reply.text.clone()),
                status: outcome.status,
                denial_reason: outcome.denial_reason,
            })
            .await
        {
            warn!("audit write failed: {e}");
        }

        let message = OutgoingMessage {
            text: outcome.reply.text,
            reply_target: incoming.reply_target.clone(),
            keyboard: outcome.reply.keyboard,
        };
        self.send(&incoming, message).await;
    }

    /// Decide the reply to one message. Never fails: every error becomes a
    /// user-facing reply.
    pub(super) async fn respond(&self, incoming: &IncomingMessage) -> Outcome {
        // --- 1. AUTH CHECK ---
        if let Err(denied) = check_auth(&self.allowed_users, &incoming.sender_id) {
            warn!(
                "auth denied for {} on {}: {denied}",
                incoming.sender_id, incoming.channel
            );
            return Outcome {
                reply: Reply::plain(self.auth_config.deny_message.clone()),
                status: AuditStatus::Denied,
                denial_reason: Some(denied.to_string()),
            };
        }

        // --- 2. SENDER IDENTITY ---
        let Ok(user_id) = incoming.sender_id.parse::<i64>() else {
            warn!("cannot use sender id {:?} as a user id", incoming.sender_id);
            return Outcome::failed(Reply::plain(replies::BAD_SENDER));
        };
        let actor = Actor {
            id: user_id,
            name: incoming.display_name(),
            at: incoming.timestamp,
        };
        let key = session_key(incoming);

        // --- 3. ROUTE ---
        let ctx = CommandContext {
            store: &self.store,
            bot_name: &self.bot_name,
            sender_name: incoming.display_name(),
        };
        let convos = &self.conversations;
        let result = match Command::parse(&incoming.text) {
            Some(Command::Start) => {
                convos.reset(&key);
                commands::handle(Command::Start, &ctx).await
            }
            Some(cmd @ (Command::Help | Command::List | Command::ListDone)) => {
                commands::handle(cmd, &ctx).await
            }
            Some(Command::Add) => convos.handle(&self.store, &key, &actor, Input::StartAdd).await,
            Some(Command::Done) => {
                convos
                    .handle(&self.store, &key, &actor, Input::StartDone)
                    .await
            }
            Some(Command::Cancel) => convos.handle(&self.store, &key, &actor, Input::Cancel).await,
            None => {
                convos
                    .handle(&self.store, &key, &actor, Input::Text(&incoming.text))
                    .await
            }
        };

        match result {
            Ok(reply) => Outcome::ok(reply),
            Err(e) => {
                error!("handling message from {key} failed: {e}");
                Outcome::failed(error_reply(&e))
            }
        }
    }
}

/// User-facing text for an error that escaped the handlers.
fn error_reply(err: &TeletaskError) -> Reply {
    match err {
        TeletaskError::Validation(msg) => Reply::plain(msg.clone()),
        TeletaskError::NotFound(id) => Reply::plain(replies::task_not_found(*id)),
        _ => Reply::plain(replies::GENERIC_ERROR),
    }
}
