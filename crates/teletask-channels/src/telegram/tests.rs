//! Tests for the Telegram channel module.

use super::polling::to_incoming;
use super::send::{bot_commands, send_message_body};
use super::types::*;
use crate::utils::split_message;
use teletask_core::message::Keyboard;

fn update(json: &str) -> TgUpdate {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_split_short_message() {
    let chunks = split_message("hello", 4096);
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn test_split_long_message() {
    let text = "a\n".repeat(3000);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= 4096);
        assert!(chunk.ends_with('\n'));
    }
}

#[test]
fn test_split_message_emoji_boundary() {
    // Each emoji is 4 bytes; byte 10 falls inside the 3rd one.
    let text = "\u{1f30d}".repeat(50);
    let chunks = split_message(&text, 10);
    for chunk in &chunks {
        assert!(chunk.len() <= 10);
    }
    let reassembled: String = chunks.iter().copied().collect();
    assert_eq!(reassembled, text);
}

#[test]
fn test_split_message_char_wider_than_limit() {
    let text = "\u{1f30d}\u{1f30d}";
    let chunks = split_message(text, 2);
    assert_eq!(chunks, vec!["\u{1f30d}", "\u{1f30d}"]);
}

#[test]
fn test_tg_chat_group_detection() {
    let group: TgChat = serde_json::from_str(r#"{"id": -100123, "type": "group"}"#).unwrap();
    let supergroup: TgChat =
        serde_json::from_str(r#"{"id": -100456, "type": "supergroup"}"#).unwrap();
    let private: TgChat = serde_json::from_str(r#"{"id": 789, "type": "private"}"#).unwrap();
    let untyped: TgChat = serde_json::from_str(r#"{"id": 123}"#).unwrap();

    assert!(group.is_group());
    assert!(supergroup.is_group());
    assert!(!private.is_group());
    assert!(!untyped.is_group());
}

#[test]
fn test_display_name_variants() {
    let full: TgUser = serde_json::from_str(
        r#"{"id": 1, "first_name": "Alice", "last_name": "Smith", "username": "ally"}"#,
    )
    .unwrap();
    assert_eq!(full.display_name(), "Alice Smith");

    let first: TgUser =
        serde_json::from_str(r#"{"id": 2, "first_name": "Bob", "username": "bobby"}"#).unwrap();
    assert_eq!(first.display_name(), "Bob");

    let handle: TgUser =
        serde_json::from_str(r#"{"id": 3, "first_name": "", "username": "carol"}"#).unwrap();
    assert_eq!(handle.display_name(), "@carol");

    let bare: TgUser = serde_json::from_str(r#"{"id": 4, "first_name": ""}"#).unwrap();
    assert_eq!(bare.display_name(), "4");
}

#[test]
fn test_to_incoming_private_text() {
    let incoming = to_incoming(update(
        r#"{
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1767225600,
                "from": {"id": 42, "first_name": "Alice"},
                "chat": {"id": 42, "type": "private"},
                "text": "/list"
            }
        }"#,
    ))
    .expect("private text message is forwarded");

    assert_eq!(incoming.channel, "telegram");
    assert_eq!(incoming.sender_id, "42");
    assert_eq!(incoming.sender_name.as_deref(), Some("Alice"));
    assert_eq!(incoming.text, "/list");
    assert_eq!(incoming.reply_target.as_deref(), Some("42"));
    assert_eq!(incoming.timestamp.timestamp(), 1767225600);
}

#[test]
fn test_to_incoming_skips_unhandled_updates() {
    // No message at all (e.g. edited_message).
    assert!(to_incoming(update(r#"{"update_id": 1}"#)).is_none());

    // No text (sticker, photo, ...).
    assert!(to_incoming(update(
        r#"{"update_id": 2, "message": {
            "from": {"id": 1, "first_name": "A"},
            "chat": {"id": 1, "type": "private"}
        }}"#
    ))
    .is_none());

    // No sender.
    assert!(to_incoming(update(
        r#"{"update_id": 3, "message": {
            "chat": {"id": 1, "type": "private"},
            "text": "hi"
        }}"#
    ))
    .is_none());

    // Group chat.
    assert!(to_incoming(update(
        r#"{"update_id": 4, "message": {
            "from": {"id": 1, "first_name": "A"},
            "chat": {"id": -5, "type": "group"},
            "text": "/list"
        }}"#
    ))
    .is_none());
}

#[test]
fn test_send_body_without_keyboard() {
    let body = send_message_body(7, "hi", None);
    assert_eq!(body["chat_id"], 7);
    assert_eq!(body["text"], "hi");
    assert!(body.get("reply_markup").is_none());
    assert!(body.get("parse_mode").is_none());
}

#[test]
fn test_send_body_with_keyboard() {
    let kb = Keyboard::new(&[&["A", "B"], &["C"]]);
    let body = send_message_body(7, "menu", Some(&kb));
    let rows = body["reply_markup"]["keyboard"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1]["text"], "B");
    assert_eq!(rows[1][0]["text"], "C");
    assert_eq!(body["reply_markup"]["resize_keyboard"], true);
}

#[test]
fn test_bot_commands_cover_router_commands() {
    let cmds = bot_commands();
    let names: Vec<&str> = cmds["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["command"].as_str().unwrap())
        .collect();
    for expected in ["start", "add", "done", "list", "done_tasks", "cancel"] {
        assert!(names.contains(&expected), "missing /{expected}");
    }
}

fn channel_at(api_base: &str) -> super::TelegramChannel {
    let config = teletask_core::config::TelegramConfig {
        bot_token: "123:abc".to_string(),
        ..Default::default()
    };
    super::TelegramChannel::with_api_base(config, api_base)
}

#[test]
fn test_method_url_public_api() {
    let config = teletask_core::config::TelegramConfig {
        bot_token: "123:abc".to_string(),
        ..Default::default()
    };
    let channel = super::TelegramChannel::new(config);
    assert_eq!(
        channel.method_url("sendMessage"),
        "https://api.telegram.org/bot123:abc/sendMessage"
    );
}

#[test]
fn test_method_url_custom_server() {
    let channel = channel_at("http://localhost:8081/");
    assert_eq!(
        channel.method_url("setMyCommands"),
        "http://localhost:8081/bot123:abc/setMyCommands"
    );
}

#[test]
fn test_updates_url_carries_timeout_and_offset() {
    let api = "https://api.telegram.org/bot123:abc";
    assert_eq!(
        super::updates_url(api, 30, None),
        "https://api.telegram.org/bot123:abc/getUpdates?timeout=30"
    );
    assert_eq!(
        super::updates_url(api, 10, Some(501)),
        "https://api.telegram.org/bot123:abc/getUpdates?timeout=10&offset=501"
    );
}

#[test]
fn test_poll_request_outlasts_poll_window() {
    let timeout = super::poll_request_timeout(30);
    assert!(timeout > std::time::Duration::from_secs(30));
}
