//! Built-in bot commands and menu buttons.
//!
//! Stateless commands (`/start`, `/help`, `/list`, `/done_tasks`) are answered
//! here. Flow commands (`/add`, `/done`, `/cancel`) are only recognized here
//! and handed to the conversation controller by the gateway.

mod status;
mod tasks;

#[cfg(test)]
mod tests;

use crate::replies::Reply;
use teletask_core::error::TeletaskError;
use teletask_store::Store;

pub const BTN_ADD: &str = "\u{2795} Add task";
pub const BTN_DONE: &str = "\u{2705} Complete task";
pub const BTN_LIST: &str = "\u{1f4cb} Open tasks";
pub const BTN_LIST_DONE: &str = "\u{1f3c1} Completed";
pub const BTN_CANCEL: &str = "\u{274c} Cancel";

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub bot_name: &'a str,
    pub sender_name: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    List,
    ListDone,
    Add,
    Done,
    Cancel,
}

impl Command {
    /// Parse a command from message text or a menu-button label.
    ///
    /// Returns `None` for anything else, including unknown `/` commands;
    /// that text is flow input.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text {
            BTN_ADD => return Some(Self::Add),
            BTN_DONE => return Some(Self::Done),
            BTN_LIST => return Some(Self::List),
            BTN_LIST_DONE => return Some(Self::ListDone),
            BTN_CANCEL => return Some(Self::Cancel),
            _ if text.eq_ignore_ascii_case("cancel") => return Some(Self::Cancel),
            _ => {}
        }

        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/list@teletask_bot" → "/list").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/list" | "/tasks" => Some(Self::List),
            "/done_tasks" | "/list_done" => Some(Self::ListDone),
            "/add" => Some(Self::Add),
            "/done" => Some(Self::Done),
            "/cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Handle a stateless command.
///
/// Flow commands are answered with the menu; the gateway never routes them
/// here.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Result<Reply, TeletaskError> {
    match cmd {
        Command::Start => status::handle_start(ctx.store, ctx.bot_name, ctx.sender_name).await,
        Command::Help => Ok(status::handle_help()),
        Command::List => tasks::handle_list(ctx.store).await,
        Command::ListDone => tasks::handle_list_done(ctx.store).await,
        Command::Add | Command::Done | Command::Cancel => {
            Ok(Reply::with_menu(crate::replies::IDLE_HINT))
        }
    }
}
