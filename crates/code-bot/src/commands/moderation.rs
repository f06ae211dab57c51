//! Admin moderation commands.

use crate::commands::{parse_arg, CommandHandler, Outcome};
use crate::error::AppResult;
use abuse_throttle::{AbuseThrottle, MutedUser};
use async_trait::async_trait;
use std::fmt::Write;
use telegram_client::BotMessage;
use tracing::info;

pub struct UnmuteHandler {
    throttle: AbuseThrottle,
}

impl UnmuteHandler {
    pub fn new(throttle: AbuseThrottle) -> Self {
        Self { throttle }
    }
}

#[async_trait]
impl CommandHandler for UnmuteHandler {
    fn name(&self) -> &str {
        "unmute"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/unmute")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        let Some(arg) = parse_arg(&message.text, "/unmute") else {
            return Ok(Outcome::Reply("Usage: /unmute <user id>".into()));
        };
        let Ok(user_id) = arg.parse::<i64>() else {
            return Ok(Outcome::Reply(
                "❌ Enter a numeric user id (digits only).".into(),
            ));
        };

        if self.throttle.unmute(user_id).await {
            info!(user_id, admin = message.user_id, "mute lifted by admin");
            Ok(Outcome::Reply(format!(
                "✅ Restrictions lifted for user {user_id}."
            )))
        } else {
            Ok(Outcome::Reply(format!(
                "ℹ️ User {user_id} has no active restrictions."
            )))
        }
    }
}

pub struct MutedListHandler {
    throttle: AbuseThrottle,
}

impl MutedListHandler {
    pub fn new(throttle: AbuseThrottle) -> Self {
        Self { throttle }
    }
}

fn format_muted(muted: &[MutedUser]) -> String {
    let mut text = String::from("📋 Restricted users:\n");
    for user in muted {
        let _ = write!(
            text,
            "\n👤 ID: {}\n⏳ Hours left: {:.1}\n🕒 Until: {}\n🔄 Mutes issued: {}\n",
            user.user_id,
            user.hours_left,
            user.muted_until.format("%Y-%m-%d %H:%M:%S"),
            user.mute_count
        );
    }
    text
}

#[async_trait]
impl CommandHandler for MutedListHandler {
    fn name(&self) -> &str {
        "muted"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/muted")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, _message: &BotMessage) -> AppResult<Outcome> {
        let muted = self.throttle.list_muted().await;
        if muted.is_empty() {
            return Ok(Outcome::Reply(
                "No users are currently restricted.".into(),
            ));
        }
        Ok(Outcome::Reply(format_muted(&muted)))
    }
}
