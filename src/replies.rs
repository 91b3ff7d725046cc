//! User-facing texts and menus.
//!
//! Static strings are constants; anything with interpolation is a function.

use crate::commands::{BTN_ADD, BTN_CANCEL, BTN_DONE, BTN_LIST, BTN_LIST_DONE};
use teletask_core::message::Keyboard;
use teletask_store::{CompletedTask, Task};

pub const GENERIC_ERROR: &str = "Something went wrong while saving or reading tasks. \
                                 Please try again later.";
pub const ADD_PROMPT: &str = "What needs to be done? Send the task description, or /cancel.";
pub const EMPTY_DESCRIPTION: &str = "The description can't be empty. Send some text, or /cancel.";
pub const NO_ACTIVE_TASKS: &str = "There are no open tasks. Nothing to complete.";
pub const SELECT_PROMPT: &str = "Send the number of the task you finished, or /cancel.";
pub const NOT_A_NUMBER: &str = "That isn't a task number. Send one of the numbers above, or /cancel.";
pub const CANCELLED: &str = "Cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
pub const IDLE_HINT: &str = "Use the menu below, or /help to see what I can do.";
pub const BAD_SENDER: &str = "Sorry, I can't tell who sent this message.";

/// Reply content produced by command and flow handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    /// Reply that shows the main menu.
    pub fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(main_menu()),
        }
    }

    /// Reply used while a flow is waiting for input.
    pub fn in_flow(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(cancel_menu()),
        }
    }

    /// Reply that leaves the current keyboard alone.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }
}

pub fn main_menu() -> Keyboard {
    Keyboard::new(&[&[BTN_ADD, BTN_DONE], &[BTN_LIST, BTN_LIST_DONE]])
}

pub fn cancel_menu() -> Keyboard {
    Keyboard::new(&[&[BTN_CANCEL]])
}

pub fn greeting(bot_name: &str, user_name: &str, open: i64) -> String {
    let open_line = match open {
        0 => "There are no open tasks right now.".to_string(),
        1 => "There is 1 open task.".to_string(),
        n => format!("There are {n} open tasks."),
    };
    format!("Hi {user_name}! I'm {bot_name}, the shared task list.\n{open_line}")
}

pub fn help() -> String {
    [
        "/add - add a new task",
        "/done - mark a task as done",
        "/list - show open tasks",
        "/done_tasks - show completed tasks",
        "/cancel - cancel what you're doing",
        "/start - show the menu",
    ]
    .join("\n")
}

pub fn task_added(id: i64, description: &str) -> String {
    format!("Added task #{id}: {description}")
}

pub fn task_not_found(id: i64) -> String {
    format!("There is no open task #{id}. Send another number, or /cancel.")
}

pub fn task_completed(task: &Task, completer_name: &str) -> String {
    format!(
        "Task #{} is done: {}\nCreated by {}, completed by {completer_name}.",
        task.id, task.description, task.creator_name
    )
}

/// Open tasks, one per line, id first.
pub fn active_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No open tasks.".to_string();
    }
    let mut out = String::from("Open tasks:\n");
    for task in tasks {
        out.push_str(&format!(
            "\n#{} {}\n    by {}, {}",
            task.id,
            task.description,
            task.creator_name,
            task.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

pub fn done_list(tasks: &[CompletedTask]) -> String {
    if tasks.is_empty() {
        return "No completed tasks yet.".to_string();
    }
    let mut out = String::from("Completed tasks:\n");
    for task in tasks {
        out.push_str(&format!(
            "\n#{} {}\n    by {}, done by {} on {}",
            task.id,
            task.description,
            task.creator_name,
            task.completer_name,
            task.completed_at.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

/// Selection prompt for the complete flow.
pub fn selection(tasks: &[Task]) -> String {
    format!("{}\n\n{SELECT_PROMPT}", active_list(tasks))
}
