//! Task records as read from the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub creator_id: i64,
    pub creator_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A task that has been moved out of the active table.
///
/// `id` is the id the task had while it was active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: i64,
    pub creator_id: i64,
    pub creator_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub completer_id: i64,
    pub completer_name: String,
    pub completed_at: DateTime<Utc>,
}
