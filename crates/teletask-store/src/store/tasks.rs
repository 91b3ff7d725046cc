//! Active and completed task CRUD.

use super::{decode_ts, encode_ts, Store};
use crate::task::{CompletedTask, Task};
use chrono::{DateTime, Utc};
use teletask_core::error::TeletaskError;
use tracing::info;

/// (id, creator_id, creator_name, description, created_at)
type TaskRow = (i64, i64, String, String, String);

/// TaskRow + (completer_id, completer_name, completed_at)
type DoneRow = (i64, i64, String, String, String, i64, String, String);

fn task_from_row(row: TaskRow) -> Result<Task, TeletaskError> {
    let (id, creator_id, creator_name, description, created_at) = row;
    Ok(Task {
        id,
        creator_id,
        creator_name,
        description,
        created_at: decode_ts(&created_at)?,
    })
}

fn done_from_row(row: DoneRow) -> Result<CompletedTask, TeletaskError> {
    let (
        id,
        creator_id,
        creator_name,
        description,
        created_at,
        completer_id,
        completer_name,
        completed_at,
    ) = row;
    Ok(CompletedTask {
        id,
        creator_id,
        creator_name,
        description,
        created_at: decode_ts(&created_at)?,
        completer_id,
        completer_name,
        completed_at: decode_ts(&completed_at)?,
    })
}

impl Store {
    /// Insert a new active task and return its id.
    pub async fn add_task(
        &self,
        user_id: i64,
        user_name: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i64, TeletaskError> {
        if description.trim().is_empty() {
            return Err(TeletaskError::Validation(
                "task description is empty".to_string(),
            ));
        }

        let result = sqlx::query(
            "INSERT INTO active_tasks (creator_id, creator_name, description, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(user_name)
        .bind(description)
        .bind(encode_ts(&created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("add task failed: {e}")))?;

        let id = result.last_insert_rowid();
        info!("task {id} added by {user_name} ({user_id})");
        Ok(id)
    }

    /// All active tasks, oldest (lowest id) first.
    pub async fn get_active_tasks(&self) -> Result<Vec<Task>, TeletaskError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, creator_id, creator_name, description, created_at \
             FROM active_tasks ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("get active tasks failed: {e}")))?;

        rows.into_iter().map(task_from_row).collect()
    }

    /// Look up one active task.
    pub async fn get_task(&self, task_id: i64) -> Result<Option<Task>, TeletaskError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, creator_id, creator_name, description, created_at \
             FROM active_tasks WHERE id = ?",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("get task failed: {e}")))?;

        row.map(task_from_row).transpose()
    }

    /// Move an active task to the completed table.
    ///
    /// Returns `false` (and changes nothing) when `task_id` is not active.
    /// The delete and the insert share one transaction: if anything fails
    /// before commit, the transaction is rolled back when dropped and the
    /// task stays active.
    pub async fn complete_task(
        &self,
        task_id: i64,
        completer_id: i64,
        completer_name: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, TeletaskError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TeletaskError::Storage(format!("begin complete failed: {e}")))?;

        // Deleting first takes the write lock up front, so two sessions
        // racing on the same id cannot both see it as active.
        let row: Option<TaskRow> = sqlx::query_as(
            "DELETE FROM active_tasks WHERE id = ? \
             RETURNING id, creator_id, creator_name, description, created_at",
        )
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| TeletaskError::Storage(format!("complete task failed: {e}")))?;

        let Some((id, creator_id, creator_name, description, created_at)) = row else {
            return Ok(false);
        };

        sqlx::query(
            "INSERT INTO done_tasks \
             (id, creator_id, creator_name, description, created_at, \
              completer_id, completer_name, completed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(creator_id)
        .bind(&creator_name)
        .bind(&description)
        .bind(&created_at)
        .bind(completer_id)
        .bind(completer_name)
        .bind(encode_ts(&completed_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| TeletaskError::Storage(format!("record completed task failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| TeletaskError::Storage(format!("commit complete failed: {e}")))?;

        info!("task {id} completed by {completer_name} ({completer_id})");
        Ok(true)
    }

    /// All completed tasks in the order they were completed.
    pub async fn get_done_tasks(&self) -> Result<Vec<CompletedTask>, TeletaskError> {
        let rows: Vec<DoneRow> = sqlx::query_as(
            "SELECT id, creator_id, creator_name, description, created_at, \
                    completer_id, completer_name, completed_at \
             FROM done_tasks ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("get done tasks failed: {e}")))?;

        rows.into_iter().map(done_from_row).collect()
    }

    /// Number of (active, completed) tasks.
    pub async fn task_counts(&self) -> Result<(i64, i64), TeletaskError> {
        sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM active_tasks), (SELECT COUNT(*) FROM done_tasks)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TeletaskError::Storage(format!("count tasks failed: {e}")))
    }
}
