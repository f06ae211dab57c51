//! Two-step contact registration for admins.
//!
//! `/add <code>` reserves the code and prompts for the contact message; the
//! next message from that admin is stored by reference (its message id and
//! chat id), so a successful lookup can replay it verbatim later.

use crate::commands::{parse_arg, validate_code, CommandHandler, Outcome};
use crate::error::AppResult;
use crate::render::ImageRenderer;
use crate::states::{PendingAction, SessionStore};
use async_trait::async_trait;
use contact_registry::{ContactRegistry, RegistryError};
use std::sync::Arc;
use telegram_client::BotMessage;
use tracing::{info, warn};

pub struct AddHandler {
    registry: Arc<ContactRegistry>,
    sessions: SessionStore,
    renderer: Arc<dyn ImageRenderer>,
}

impl AddHandler {
    pub fn new(
        registry: Arc<ContactRegistry>,
        sessions: SessionStore,
        renderer: Arc<dyn ImageRenderer>,
    ) -> Self {
        Self {
            registry,
            sessions,
            renderer,
        }
    }

    async fn start(&self, message: &BotMessage) -> Outcome {
        let Some(code) = parse_arg(&message.text, "/add") else {
            return Outcome::Reply("Usage: /add <4-digit code>".into());
        };
        if !validate_code(code) {
            return Outcome::Reply(
                "❌ Invalid code format. A code is exactly 4 digits.".into(),
            );
        }

        self.sessions.set(
            message.user_id,
            PendingAction::AwaitingContactInfo { code: code.into() },
        );
        Outcome::Reply(format!(
            "Now send the contact message to store for code {code}."
        ))
    }

    async fn complete(&self, message: &BotMessage, code: String) -> AppResult<Outcome> {
        // The message itself is the content: store its id and origin chat so
        // the transport can replay it later.
        let reference = message.message_id.to_string();
        match self
            .registry
            .add_entry(&code, &reference, message.chat_id)
            .await
        {
            Ok(()) => {}
            Err(RegistryError::DuplicateCode(_)) => {
                return Ok(Outcome::Reply(
                    "❌ This code is taken, pick another one.".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!(code, user_id = message.user_id, "contact registered");

        // The image is a nicety; a failure here must not lose the entry.
        match self.attach_image(&code).await {
            Ok(path) => Ok(Outcome::Photo {
                path,
                caption: format!("✅ Contact stored.\nCode: {code}"),
            }),
            Err(e) => {
                warn!(code, error = %e, "code image could not be attached");
                Ok(Outcome::Reply(format!(
                    "✅ Contact stored under code {code}, but the code image \
                     could not be created."
                )))
            }
        }
    }

    async fn attach_image(&self, code: &str) -> AppResult<std::path::PathBuf> {
        let path = self.renderer.render(code).await?;
        self.registry
            .set_image_path(code, &path.to_string_lossy())
            .await?;
        Ok(path)
    }
}

#[async_trait]
impl CommandHandler for AddHandler {
    fn name(&self) -> &str {
        "add"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/add")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    fn matches(&self, message: &BotMessage) -> bool {
        message.text == "/add"
            || message.text.starts_with("/add ")
            || (!message.text.starts_with('/') && self.sessions.peek(message.user_id).is_some())
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        if message.text.starts_with("/add") {
            return Ok(self.start(message).await);
        }
        match self.sessions.take(message.user_id) {
            Some(PendingAction::AwaitingContactInfo { code }) => {
                self.complete(message, code).await
            }
            None => Ok(Outcome::Silent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StockImageRenderer;
    use contact_registry::SENTINEL_IMAGE;
    use tempfile::TempDir;

    fn msg(user_id: i64, message_id: i64, text: &str) -> BotMessage {
        BotMessage {
            chat_id: user_id,
            user_id,
            message_id,
            text: text.into(),
        }
    }

    async fn handler() -> (AddHandler, Arc<ContactRegistry>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SENTINEL_IMAGE), b"png").unwrap();

        let registry = Arc::new(ContactRegistry::in_memory().await.unwrap());
        let handler = AddHandler::new(
            registry.clone(),
            SessionStore::new(),
            Arc::new(StockImageRenderer::new(dir.path())),
        );
        (handler, registry, dir)
    }

    #[tokio::test]
    async fn test_two_step_add_stores_message_reference() {
        let (handler, registry, _dir) = handler().await;

        let outcome = handler.execute(&msg(9, 10, "/add 1234")).await.unwrap();
        assert!(matches!(outcome, Outcome::Reply(text) if text.contains("code 1234")));

        let outcome = handler
            .execute(&msg(9, 55, "call me at +1-555-0100"))
            .await
            .unwrap();
        match outcome {
            Outcome::Photo { path, caption } => {
                assert!(caption.contains("1234"));
                assert!(path.exists());
            }
            other => panic!("expected photo, got {other:?}"),
        }

        let entry = registry.lookup("1234").await.unwrap().unwrap();
        assert_eq!(entry.contact_reference, "55");
        assert_eq!(entry.origin_channel_id, 9);
        assert!(entry.image_path.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_code_reported_at_completion() {
        let (handler, registry, _dir) = handler().await;
        registry.add_entry("1234", "1", 1).await.unwrap();

        handler.execute(&msg(9, 10, "/add 1234")).await.unwrap();
        let outcome = handler.execute(&msg(9, 11, "info")).await.unwrap();

        assert!(matches!(outcome, Outcome::Reply(text) if text.contains("taken")));
        // The pending state is consumed either way.
        assert!(!handler.matches(&msg(9, 12, "more text")));
    }

    #[tokio::test]
    async fn test_invalid_code_rejected_up_front() {
        let (handler, _registry, _dir) = handler().await;

        let outcome = handler.execute(&msg(9, 10, "/add 12ab")).await.unwrap();
        assert!(matches!(outcome, Outcome::Reply(text) if text.contains("Invalid code format")));
        assert!(!handler.matches(&msg(9, 11, "orphan message")));
    }

    #[tokio::test]
    async fn test_entry_survives_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        // No stock image: rendering will fail.
        let registry = Arc::new(ContactRegistry::in_memory().await.unwrap());
        let handler = AddHandler::new(
            registry.clone(),
            SessionStore::new(),
            Arc::new(StockImageRenderer::new(dir.path())),
        );

        handler.execute(&msg(9, 10, "/add 1234")).await.unwrap();
        let outcome = handler.execute(&msg(9, 11, "info")).await.unwrap();

        assert!(
            matches!(outcome, Outcome::Reply(text) if text.contains("could not be created"))
        );
        assert!(registry.lookup("1234").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_matches_only_with_pending_session() {
        let (handler, _registry, _dir) = handler().await;

        assert!(handler.matches(&msg(9, 1, "/add 1234")));
        assert!(!handler.matches(&msg(9, 1, "plain text")));
        assert!(!handler.matches(&msg(9, 1, "/addendum")));

        handler.execute(&msg(9, 1, "/add 1234")).await.unwrap();
        assert!(handler.matches(&msg(9, 2, "plain text")));
        // Other users are unaffected.
        assert!(!handler.matches(&msg(8, 2, "plain text")));
    }
}
