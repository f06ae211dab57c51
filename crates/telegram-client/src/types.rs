//! Telegram Bot API wire types.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API call returns.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Result payload of `copyMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageId {
    pub message_id: i64,
}

/// Parameters for `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

/// Parameters for `copyMessage`.
#[derive(Debug, Serialize)]
pub struct CopyMessageRequest {
    pub chat_id: i64,
    pub from_chat_id: i64,
    pub message_id: i64,
}

/// A normalized incoming text message for the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub message_id: i64,
    pub text: String,
}

impl BotMessage {
    /// Convert a raw update into a bot message, skipping anything that is
    /// not a plain text message from an identified user.
    pub fn from_update(update: &Update) -> Option<Self> {
        let message = update.message.as_ref()?;
        let from = message.from.as_ref()?;
        let text = message.text.as_ref()?;
        Some(Self {
            chat_id: message.chat.id,
            user_id: from.id,
            message_id: message.message_id,
            text: text.clone(),
        })
    }
}
