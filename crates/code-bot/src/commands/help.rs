//! Greeting, help, and fallback handlers.

use crate::commands::{CommandHandler, Outcome};
use crate::error::AppResult;
use abuse_throttle::AbuseThrottle;
use async_trait::async_trait;
use telegram_client::BotMessage;

const WELCOME_TEXT: &str = "👋 Welcome!\n\n\
🔍 Send /code <4-digit code> to look up a contact.\n\
❓ Send /help if you have questions.";

const HELP_TEXT: &str = "ℹ️ How to use this bot:\n\n\
1️⃣ Send /code followed by your 4-digit code, e.g. /code 1234\n\
2️⃣ On a match you receive the stored contact details\n\
3️⃣ Repeated failed attempts temporarily restrict access";

pub struct StartHandler {
    throttle: AbuseThrottle,
}

impl StartHandler {
    pub fn new(throttle: AbuseThrottle) -> Self {
        Self { throttle }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    fn name(&self) -> &str {
        "start"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/start")
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        if self.throttle.is_muted(message.user_id).await {
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Reply(WELCOME_TEXT.into()))
    }
}

pub struct HelpHandler {
    throttle: AbuseThrottle,
}

impl HelpHandler {
    pub fn new(throttle: AbuseThrottle) -> Self {
        Self { throttle }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &str {
        "help"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/help")
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        if self.throttle.is_muted(message.user_id).await {
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Reply(HELP_TEXT.into()))
    }
}

/// Fallback for anything no other handler claimed.
pub struct UnknownHandler {
    throttle: AbuseThrottle,
}

impl UnknownHandler {
    pub fn new(throttle: AbuseThrottle) -> Self {
        Self { throttle }
    }
}

#[async_trait]
impl CommandHandler for UnknownHandler {
    fn name(&self) -> &str {
        "unknown"
    }

    fn is_default(&self) -> bool {
        true
    }

    fn matches(&self, _message: &BotMessage) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        if self.throttle.is_muted(message.user_id).await {
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Reply(
            "❓ Use /code <4-digit code> to look up a contact, or /help.".into(),
        ))
    }
}
