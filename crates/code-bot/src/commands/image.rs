//! Admin command to fetch the stored code image.

use crate::commands::{parse_arg, validate_code, CommandHandler, Outcome};
use crate::error::AppResult;
use async_trait::async_trait;
use contact_registry::ContactRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use telegram_client::BotMessage;

pub struct ImageHandler {
    registry: Arc<ContactRegistry>,
}

impl ImageHandler {
    pub fn new(registry: Arc<ContactRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl CommandHandler for ImageHandler {
    fn name(&self) -> &str {
        "image"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/img")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        let Some(code) = parse_arg(&message.text, "/img") else {
            return Ok(Outcome::Reply("Usage: /img <4-digit code>".into()));
        };
        if !validate_code(code) {
            return Ok(Outcome::Reply(
                "❌ Invalid code format. A code is exactly 4 digits.".into(),
            ));
        }

        match self.registry.image_path(code).await? {
            Some(path) if PathBuf::from(&path).is_file() => Ok(Outcome::Photo {
                path: path.into(),
                caption: format!("🎯 Image for code {code}"),
            }),
            _ => Ok(Outcome::Reply(
                "⚠️ No image stored for that code.".into(),
            )),
        }
    }
}
