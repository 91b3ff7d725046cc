use crate::{
    error::TeletaskError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive and send
/// messages. The bot core only ever sees `IncomingMessage` / `OutgoingMessage`.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, TeletaskError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), TeletaskError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TeletaskError>;
}
