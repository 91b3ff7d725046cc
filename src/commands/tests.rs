use super::*;
use crate::replies::{self, main_menu};
use crate::test_utils::{t0, test_store};

fn ctx<'a>(store: &'a Store) -> CommandContext<'a> {
    CommandContext {
        store,
        bot_name: "Teletask",
        sender_name: "Alice",
    }
}

#[test]
fn test_parse_slash_commands() {
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/help"), Some(Command::Help));
    assert_eq!(Command::parse("/list"), Some(Command::List));
    assert_eq!(Command::parse("/tasks"), Some(Command::List));
    assert_eq!(Command::parse("/done_tasks"), Some(Command::ListDone));
    assert_eq!(Command::parse("/list_done"), Some(Command::ListDone));
    assert_eq!(Command::parse("/add"), Some(Command::Add));
    assert_eq!(Command::parse("/done"), Some(Command::Done));
    assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
}

#[test]
fn test_parse_strips_botname_and_args() {
    assert_eq!(Command::parse("/list@teletask_bot"), Some(Command::List));
    assert_eq!(Command::parse("  /add buy milk "), Some(Command::Add));
    assert_eq!(Command::parse("/done@teletask_bot 3"), Some(Command::Done));
}

#[test]
fn test_parse_menu_buttons() {
    assert_eq!(Command::parse(BTN_ADD), Some(Command::Add));
    assert_eq!(Command::parse(BTN_DONE), Some(Command::Done));
    assert_eq!(Command::parse(BTN_LIST), Some(Command::List));
    assert_eq!(Command::parse(BTN_LIST_DONE), Some(Command::ListDone));
    assert_eq!(Command::parse(BTN_CANCEL), Some(Command::Cancel));
}

#[test]
fn test_every_menu_label_is_a_command() {
    for row in main_menu().rows.iter().chain(replies::cancel_menu().rows.iter()) {
        for label in row {
            assert!(Command::parse(label).is_some(), "unrecognized button {label}");
        }
    }
}

#[test]
fn test_parse_bare_cancel_any_case() {
    assert_eq!(Command::parse("cancel"), Some(Command::Cancel));
    assert_eq!(Command::parse("CANCEL"), Some(Command::Cancel));
    assert_eq!(Command::parse(" Cancel "), Some(Command::Cancel));
    assert_eq!(Command::parse("cancel it"), None);
}

#[test]
fn test_parse_other_text_is_not_a_command() {
    assert_eq!(Command::parse("Buy milk"), None);
    assert_eq!(Command::parse("3"), None);
    assert_eq!(Command::parse("/unknown"), None);
    assert_eq!(Command::parse("start"), None);
    assert_eq!(Command::parse(""), None);
}

#[tokio::test]
async fn test_start_greets_with_open_count() {
    let store = test_store().await;
    store.add_task(1, "Alice", "Buy milk", t0()).await.unwrap();
    store.add_task(2, "Bob", "Fix tap", t0()).await.unwrap();

    let reply = handle(Command::Start, &ctx(&store)).await.unwrap();
    assert!(reply.text.contains("Alice"));
    assert!(reply.text.contains("Teletask"));
    assert!(reply.text.contains("2 open tasks"));
    assert_eq!(reply.keyboard, Some(main_menu()));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let store = test_store().await;
    let reply = handle(Command::Help, &ctx(&store)).await.unwrap();
    for cmd in ["/add", "/done", "/list", "/done_tasks", "/cancel"] {
        assert!(reply.text.contains(cmd), "help is missing {cmd}");
    }
}

#[tokio::test]
async fn test_list_empty_and_filled() {
    let store = test_store().await;
    let reply = handle(Command::List, &ctx(&store)).await.unwrap();
    assert_eq!(reply.text, "No open tasks.");

    let a = store.add_task(1, "Alice", "Buy milk", t0()).await.unwrap();
    let b = store.add_task(2, "Bob", "Fix tap", t0()).await.unwrap();
    let reply = handle(Command::List, &ctx(&store)).await.unwrap();
    assert!(reply.text.contains(&format!("#{a} Buy milk")));
    assert!(reply.text.contains(&format!("#{b} Fix tap")));
    assert!(reply.text.contains("by Bob, 2026-03-01 09:30"));
    assert!(reply.text.find("Buy milk") < reply.text.find("Fix tap"));
    assert_eq!(reply.keyboard, None);
}

#[tokio::test]
async fn test_list_done_shows_completer() {
    let store = test_store().await;
    let reply = handle(Command::ListDone, &ctx(&store)).await.unwrap();
    assert_eq!(reply.text, "No completed tasks yet.");

    let id = store.add_task(1, "Alice", "Buy milk", t0()).await.unwrap();
    assert!(store.complete_task(id, 2, "Bob", t0()).await.unwrap());

    let reply = handle(Command::ListDone, &ctx(&store)).await.unwrap();
    assert!(reply.text.contains(&format!("#{id} Buy milk")));
    assert!(reply.text.contains("by Alice, done by Bob"));

    // Listing never mutates.
    assert_eq!(store.task_counts().await.unwrap(), (0, 1));
}

#[tokio::test]
async fn test_flow_commands_answer_with_menu() {
    let store = test_store().await;
    for cmd in [Command::Add, Command::Done, Command::Cancel] {
        let reply = handle(cmd, &ctx(&store)).await.unwrap();
        assert_eq!(reply.text, replies::IDLE_HINT);
        assert_eq!(reply.keyboard, Some(main_menu()));
    }
    assert_eq!(store.task_counts().await.unwrap(), (0, 0));
}
