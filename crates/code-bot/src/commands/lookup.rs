//! Gated code lookup with abuse throttling.

use crate::commands::{parse_arg, validate_code, CommandHandler, Outcome};
use crate::error::AppResult;
use abuse_throttle::AbuseThrottle;
use async_trait::async_trait;
use contact_registry::ContactRegistry;
use std::sync::Arc;
use telegram_client::BotMessage;
use tracing::{info, warn};

pub struct LookupHandler {
    registry: Arc<ContactRegistry>,
    throttle: AbuseThrottle,
}

impl LookupHandler {
    pub fn new(registry: Arc<ContactRegistry>, throttle: AbuseThrottle) -> Self {
        Self { registry, throttle }
    }

    /// Register a failed attempt, muting when the limit is reached.
    async fn handle_failure(&self, user_id: i64, reason: &str) -> Outcome {
        let outcome = self.throttle.record_failure(user_id).await;
        if outcome.should_mute {
            let mute = self.throttle.mute(user_id).await;
            warn!(
                user_id,
                duration_hours = mute.duration_hours,
                "user muted after repeated failures"
            );
            Outcome::Reply(format!(
                "🚫 Access temporarily restricted.\n\n\
                 Too many failed attempts; the bot is unavailable to you \
                 for {} hour(s).\n\
                 ⏳ The restriction lifts at {}.",
                mute.duration_hours,
                mute.muted_until.format("%Y-%m-%d %H:%M:%S"),
            ))
        } else {
            Outcome::Reply(format!(
                "❌ {reason}\n⚠️ Attempts left: {}",
                outcome.attempts_left
            ))
        }
    }
}

#[async_trait]
impl CommandHandler for LookupHandler {
    fn name(&self) -> &str {
        "lookup"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/code")
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        if self.throttle.is_muted(message.user_id).await {
            return Ok(Outcome::Silent);
        }

        let Some(code) = parse_arg(&message.text, "/code") else {
            return Ok(Outcome::Reply("🔢 Usage: /code <4-digit code>".into()));
        };

        if !validate_code(code) {
            return Ok(self
                .handle_failure(
                    message.user_id,
                    "Invalid code format. A code is exactly 4 digits.",
                )
                .await);
        }

        match self.registry.lookup(code).await? {
            Some(entry) => {
                self.throttle.reset_on_success(message.user_id).await;
                info!(code, user_id = message.user_id, "code matched");
                Ok(Outcome::Replay {
                    contact_reference: entry.contact_reference,
                    origin_channel_id: entry.origin_channel_id,
                })
            }
            None => Ok(self.handle_failure(message.user_id, "Code not found.").await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(user_id: i64, text: &str) -> BotMessage {
        BotMessage {
            chat_id: user_id,
            user_id,
            message_id: 1,
            text: text.into(),
        }
    }

    async fn handler_with(entries: &[(&str, &str, i64)]) -> LookupHandler {
        let registry = Arc::new(ContactRegistry::in_memory().await.unwrap());
        for (code, reference, chat) in entries {
            registry.add_entry(code, reference, *chat).await.unwrap();
        }
        LookupHandler::new(registry, AbuseThrottle::new())
    }

    fn reply_text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_hit_replays_stored_content() {
        let handler = handler_with(&[("1234", "77", -100500)]).await;

        let outcome = handler.execute(&msg(7, "/code 1234")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Replay {
                contact_reference: "77".into(),
                origin_channel_id: -100500,
            }
        );
    }

    #[tokio::test]
    async fn test_miss_counts_down_then_mutes() {
        let handler = handler_with(&[]).await;

        for left in [4, 3, 2, 1] {
            let text = reply_text(handler.execute(&msg(7, "/code 9999")).await.unwrap());
            assert!(text.contains("Code not found"));
            assert!(text.contains(&format!("Attempts left: {left}")));
        }

        let text = reply_text(handler.execute(&msg(7, "/code 9999")).await.unwrap());
        assert!(text.contains("temporarily restricted"));
        assert!(text.contains("1 hour(s)"));

        // Muted users are ignored afterwards.
        let outcome = handler.execute(&msg(7, "/code 9999")).await.unwrap();
        assert_eq!(outcome, Outcome::Silent);
    }

    #[tokio::test]
    async fn test_malformed_code_counts_as_failure() {
        let handler = handler_with(&[]).await;

        let text = reply_text(handler.execute(&msg(7, "/code abcd")).await.unwrap());
        assert!(text.contains("Invalid code format"));
        assert!(text.contains("Attempts left: 4"));
    }

    #[tokio::test]
    async fn test_success_resets_attempts() {
        let handler = handler_with(&[("1234", "77", 1)]).await;

        for _ in 0..3 {
            handler.execute(&msg(7, "/code 9999")).await.unwrap();
        }
        handler.execute(&msg(7, "/code 1234")).await.unwrap();

        let text = reply_text(handler.execute(&msg(7, "/code 9999")).await.unwrap());
        assert!(text.contains("Attempts left: 4"));
    }

    #[tokio::test]
    async fn test_bare_trigger_shows_usage_without_counting() {
        let handler = handler_with(&[]).await;

        let text = reply_text(handler.execute(&msg(7, "/code")).await.unwrap());
        assert!(text.contains("Usage"));

        let text = reply_text(handler.execute(&msg(7, "/code 9999")).await.unwrap());
        assert!(text.contains("Attempts left: 4"));
    }

    #[tokio::test]
    async fn test_users_are_throttled_independently() {
        let handler = handler_with(&[]).await;

        for _ in 0..5 {
            handler.execute(&msg(7, "/code 9999")).await.unwrap();
        }
        assert_eq!(
            handler.execute(&msg(7, "/code 9999")).await.unwrap(),
            Outcome::Silent
        );

        let text = reply_text(handler.execute(&msg(8, "/code 9999")).await.unwrap());
        assert!(text.contains("Attempts left: 4"));
    }
}
