//! Read-only task listings: /list, /done_tasks.

use crate::replies::{self, Reply};
use teletask_core::error::TeletaskError;
use teletask_store::Store;

pub(super) async fn handle_list(store: &Store) -> Result<Reply, TeletaskError> {
    let tasks = store.get_active_tasks().await?;
    Ok(Reply::plain(replies::active_list(&tasks)))
}

pub(super) async fn handle_list_done(store: &Store) -> Result<Reply, TeletaskError> {
    let tasks = store.get_done_tasks().await?;
    Ok(Reply::plain(replies::done_list(&tasks)))
}
