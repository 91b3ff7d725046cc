//! Audit log. Records every message the bot handles.

use sqlx::SqlitePool;
use teletask_core::error::TeletaskError;
use tracing::debug;
use uuid::Uuid;

/// An entry to write to the audit log.
pub struct AuditEntry {
    pub channel: String,
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub input_text: String,
    pub output_text: Option<String>,
    pub status: AuditStatus,
    pub denial_reason: Option<String>,
}

/// Status of an audited interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Ok,
    Error,
    Denied,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Denied => "denied",
        }
    }
}

/// Audit logger backed by SQLite.
#[derive(Clone)]
pub struct AuditLogger {
    pool: SqlitePool,
}

impl AuditLogger {
    /// Create a new audit logger sharing the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry to the audit log.
    pub async fn log(&self, entry: &AuditEntry) -> Result<(), TeletaskError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO audit_log \
             (id, channel, sender_id, sender_name, input_text, output_text, status, denial_reason) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&entry.channel)
        .bind(&entry.sender_id)
        .bind(&entry.sender_name)
        .bind(&entry.input_text)
        .bind(&entry.output_text)
        .bind(entry.status.as_str())
        .bind(&entry.denial_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("audit log write failed: {e}")))?;

        debug!(
            "audit: {} {} [{}] {}",
            entry.channel,
            entry.sender_id,
            entry.status.as_str(),
            truncate(&entry.input_text, 80)
        );

        Ok(())
    }

    /// Number of entries with the given status, across all senders.
    pub async fn count(&self, status: AuditStatus) -> Result<i64, TeletaskError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_log WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TeletaskError::Storage(format!("audit count failed: {e}")))?;
        Ok(n)
    }
}

/// Cut `s` to at most `max` bytes without splitting a character.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes; byte 3 falls inside the second one.
        assert_eq!(truncate("éé", 3), "é");
        assert_eq!(truncate("\u{1f30d}x", 2), "");
    }
}
