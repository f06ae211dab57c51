//! Minimal Telegram Bot API client.
//!
//! Covers exactly what the bot needs: identity check, long-poll update
//! stream, text replies, content replay via `copyMessage`, and photo upload.

mod client;
mod error;
mod receiver;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use receiver::UpdateReceiver;
pub use types::*;
