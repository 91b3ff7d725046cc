//! Per-user conversation state for the multi-step flows.
//!
//! Two flows exist: adding a task (ask for a description) and completing a
//! task (list open tasks, ask for an id). Each sender has at most one flow in
//! progress; a sender with no entry in the map is idle.
//!
//! Tasks are selected by their persistent id, never by position in the list
//! shown to the user, so a task completed by someone else in the meantime
//! cannot shift what a number refers to.


use crate::replies::{self, Reply};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use teletask_core::error::TeletaskError;
use teletask_store::Store;
use tracing::debug;

/// Where a sender is in a multi-step flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Idle,
    /// `/add` was sent; the next text is the task description.
    AwaitingDescription,
    /// `/done` was sent; the next number is the id of the task to complete.
    AwaitingSelection,
}

/// One step of input into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    StartAdd,
    StartDone,
    Cancel,
    Text(&'a str),
}

/// The user a step is performed for.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub id: i64,
    pub name: &'a str,
    pub at: DateTime<Utc>,
}

/// Session map, keyed by `channel:sender_id`.
#[derive(Default)]
pub struct Conversations {
    sessions: Mutex<HashMap<String, Flow>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flow for a session.
    pub fn flow(&self, key: &str) -> Flow {
        self.sessions()
            .get(key)
            .copied()
            .unwrap_or_default()
    }

    /// Number of senders with a flow in progress.
    pub fn active_count(&self) -> usize {
        self.sessions().len()
    }

    // A poisoned map only means another handler panicked mid-update; the
    // entries are plain values and still usable.
    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Flow>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop any flow in progress for a session.
    pub fn reset(&self, key: &str) {
        self.set(key, Flow::Idle);
    }

    fn set(&self, key: &str, flow: Flow) {
        let mut sessions = self.sessions();
        match flow {
            Flow::Idle => {
                sessions.remove(key);
            }
            other => {
                sessions.insert(key.to_string(), other);
            }
        }
    }

    /// Advance the session `key` by one input.
    ///
    /// On `Err` (store failure) the session keeps the flow it had before the
    /// call, so the user can simply retry.
    pub async fn handle(
        &self,
        store: &Store,
        key: &str,
        actor: &Actor<'_>,
        input: Input<'_>,
    ) -> Result<Reply, TeletaskError> {
        let current = self.flow(key);
        let (next, reply) = step(store, current, actor, input).await?;
        if next != current {
            debug!("session {key}: {current:?} -> {next:?}");
        }
        self.set(key, next);
        Ok(reply)
    }
}

/// The state machine proper: current flow + input → next flow + reply.
async fn step(
    store: &Store,
    current: Flow,
    actor: &Actor<'_>,
    input: Input<'_>,
) -> Result<(Flow, Reply), TeletaskError> {
    match (current, input) {
        (Flow::Idle, Input::Cancel) => Ok((Flow::Idle, Reply::with_menu(replies::NOTHING_TO_CANCEL))),
        (_, Input::Cancel) => Ok((Flow::Idle, Reply::with_menu(replies::CANCELLED))),

        // Starting a flow replaces whatever was in progress.
        (_, Input::StartAdd) => Ok((
            Flow::AwaitingDescription,
            Reply::in_flow(replies::ADD_PROMPT),
        )),
        (_, Input::StartDone) => {
            let tasks = store.get_active_tasks().await?;
            if tasks.is_empty() {
                return Ok((Flow::Idle, Reply::with_menu(replies::NO_ACTIVE_TASKS)));
            }
            Ok((
                Flow::AwaitingSelection,
                Reply::in_flow(replies::selection(&tasks)),
            ))
        }

        (Flow::Idle, Input::Text(_)) => Ok((Flow::Idle, Reply::with_menu(replies::IDLE_HINT))),

        (Flow::AwaitingDescription, Input::Text(text)) => {
            let description = text.trim();
            if description.is_empty() {
                return Ok((
                    Flow::AwaitingDescription,
                    Reply::in_flow(replies::EMPTY_DESCRIPTION),
                ));
            }
            let id = store
                .add_task(actor.id, actor.name, description, actor.at)
                .await?;
            Ok((
                Flow::Idle,
                Reply::with_menu(replies::task_added(id, description)),
            ))
        }

        (Flow::AwaitingSelection, Input::Text(text)) => {
            let Some(id) = parse_task_id(text) else {
                return Ok((
                    Flow::AwaitingSelection,
                    Reply::in_flow(replies::NOT_A_NUMBER),
                ));
            };
            match complete(store, id, actor).await {
                Ok(reply) => Ok((Flow::Idle, reply)),
                Err(TeletaskError::NotFound(id)) => Ok((
                    Flow::AwaitingSelection,
                    Reply::in_flow(replies::task_not_found(id)),
                )),
                Err(e) => Err(e),
            }
        }
    }
}

/// Complete `id` as `actor`. `NotFound` when the id is not an open task,
/// including when someone else completed it first.
async fn complete(store: &Store, id: i64, actor: &Actor<'_>) -> Result<Reply, TeletaskError> {
    let task = store
        .get_task(id)
        .await?
        .ok_or(TeletaskError::NotFound(id))?;
    if !store
        .complete_task(id, actor.id, actor.name, actor.at)
        .await?
    {
        return Err(TeletaskError::NotFound(id));
    }
    Ok(Reply::with_menu(replies::task_completed(&task, actor.name)))
}

/// Parse a task id as typed by a user: `3`, ` 3 `, or `#3`.
pub fn parse_task_id(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix('#').unwrap_or(text);
    digits.parse().ok()
}
