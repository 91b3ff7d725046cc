//! Greeting and help: /start, /help.

use crate::replies::{self, Reply};
use teletask_core::error::TeletaskError;
use teletask_store::Store;

pub(super) async fn handle_start(
    store: &Store,
    bot_name: &str,
    sender_name: &str,
) -> Result<Reply, TeletaskError> {
    let (open, _) = store.task_counts().await?;
    Ok(Reply::with_menu(replies::greeting(bot_name, sender_name, open)))
}

pub(super) fn handle_help() -> Reply {
    Reply::with_menu(replies::help())
}
