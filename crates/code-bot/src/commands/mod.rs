//! Bot command handlers.

mod add;
mod clear;
mod delete;
mod help;
mod image;
mod list;
mod lookup;
mod moderation;

pub use add::AddHandler;
pub use clear::ClearHandler;
pub use delete::DeleteHandler;
pub use help::{HelpHandler, StartHandler, UnknownHandler};
pub use image::ImageHandler;
pub use list::ListHandler;
pub use lookup::LookupHandler;
pub use moderation::{MutedListHandler, UnmuteHandler};

use crate::error::AppResult;
use async_trait::async_trait;
use std::path::PathBuf;
use telegram_client::BotMessage;

/// What the dispatcher should do with the result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send a plain text reply.
    Reply(String),
    /// Upload a photo with a caption.
    Photo { path: PathBuf, caption: String },
    /// Replay previously stored content back to the requester.
    Replay {
        contact_reference: String,
        origin_channel_id: i64,
    },
    /// Say nothing. Muted users are ignored entirely.
    Silent,
}

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name (e.g., "lookup", "add").
    fn name(&self) -> &str;

    /// Command trigger (e.g., "/code").
    fn trigger(&self) -> Option<&str> {
        None
    }

    /// Whether only configured admins may run this command.
    fn is_admin_only(&self) -> bool {
        false
    }

    /// Whether this is the fallback handler for unmatched messages.
    fn is_default(&self) -> bool {
        false
    }

    /// Check if this handler matches the message.
    fn matches(&self, message: &BotMessage) -> bool {
        if let Some(trigger) = self.trigger() {
            message.text == trigger || message.text.starts_with(&format!("{trigger} "))
        } else {
            self.is_default()
        }
    }

    /// Execute the command.
    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome>;
}

/// A code is exactly four ASCII decimal digits.
pub fn validate_code(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Extract the argument after the trigger word, if any.
pub fn parse_arg<'a>(text: &'a str, trigger: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(trigger)?.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}
