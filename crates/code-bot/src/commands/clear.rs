//! Admin command to wipe the registry.

use crate::commands::{CommandHandler, Outcome};
use crate::error::AppResult;
use async_trait::async_trait;
use contact_registry::ContactRegistry;
use std::sync::Arc;
use telegram_client::BotMessage;
use tracing::info;

pub struct ClearHandler {
    registry: Arc<ContactRegistry>,
}

impl ClearHandler {
    pub fn new(registry: Arc<ContactRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl CommandHandler for ClearHandler {
    fn name(&self) -> &str {
        "clear"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/clear")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) -> AppResult<Outcome> {
        self.registry.clear_all().await?;
        info!(user_id = message.user_id, "registry cleared by admin");
        Ok(Outcome::Reply(
            "Registry cleared; all images except the stock placeholder removed.".into(),
        ))
    }
}
