//! Admin command to remove a single entry.

use crate::commands::{parse_arg, validate_code, CommandHandler, Outcome};
use crate::error::AppResult;
use async_trait::async_trait;
use contact_registry::{ContactRegistry, RegistryError};
use std::sync::Arc;
use telegram_client::BotMessage;

pub struct DeleteHandler {
    registry: Arc<ContactRegistry>,
}

impl DeleteHandler {
    pub fn new(registry: Arc<ContactRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl CommandHandler for DeleteHandler {
    fn name(&self) -> &str {
        "delete"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/del")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        let Some(code) = parse_arg(&message.text, "/del") else {
            return Ok(Outcome::Reply("Usage: /del <4-digit code>".into()));
        };
        if !validate_code(code) {
            return Ok(Outcome::Reply(
                "❌ Invalid code format. A code is exactly 4 digits.".into(),
            ));
        }

        match self.registry.remove_entry(code).await {
            Ok(()) => Ok(Outcome::Reply(format!(
                "Entry {code} and its image (if there was one) deleted."
            ))),
            Err(RegistryError::NotFound(_)) => {
                Ok(Outcome::Reply(format!("No entry with code {code}.")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
