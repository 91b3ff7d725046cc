use thiserror::Error;

/// Top-level error type for Teletask.
#[derive(Debug, Error)]
pub enum TeletaskError {
    /// Configuration error. Fatal at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Persistent store failure. The operation was not applied.
    #[error("storage error: {0}")]
    Storage(String),

    /// User input that cannot be used as-is (empty description, non-numeric id).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced task is not among the active tasks.
    #[error("task {0} not found")]
    NotFound(i64),

    /// Sender is not on the allow-list.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
