//! Telegram Bot API deserialization types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgMessage {
    pub from: Option<TgUser>,
    pub chat: TgChat,
    pub text: Option<String>,
    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl TgUser {
    /// Name shown in task listings: "First Last", else "First", else "@username".
    pub fn display_name(&self) -> String {
        match (&self.last_name, &self.username) {
            (Some(ln), _) if !self.first_name.is_empty() => format!("{} {ln}", self.first_name),
            _ if !self.first_name.is_empty() => self.first_name.clone(),
            (_, Some(un)) => format!("@{un}"),
            _ => self.id.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}

impl TgChat {
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}
