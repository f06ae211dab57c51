//! Admin command to list every registered code.

use crate::commands::{CommandHandler, Outcome};
use crate::error::AppResult;
use async_trait::async_trait;
use contact_registry::{ContactRegistry, ContactSummary};
use std::fmt::Write;
use std::sync::Arc;
use telegram_client::BotMessage;

pub struct ListHandler {
    registry: Arc<ContactRegistry>,
}

impl ListHandler {
    pub fn new(registry: Arc<ContactRegistry>) -> Self {
        Self { registry }
    }
}

fn format_contacts(contacts: &[ContactSummary]) -> String {
    let mut text = String::from("📋 Registered contacts:\n");
    for contact in contacts {
        let _ = write!(
            text,
            "\n🔹 Code: {}\n📝 Reference: {} (chat {})\n",
            contact.code, contact.contact_reference, contact.origin_channel_id
        );
    }
    text
}

#[async_trait]
impl CommandHandler for ListHandler {
    fn name(&self) -> &str {
        "list"
    }

    fn trigger(&self) -> Option<&str> {
        Some("/list")
    }

    fn is_admin_only(&self) -> bool {
        true
    }

    async fn execute(&self, _message: &BotMessage) -> AppResult<Outcome> {
        let contacts = self.registry.list_all().await?;
        if contacts.is_empty() {
            return Ok(Outcome::Reply("The contact list is empty.".into()));
        }
        Ok(Outcome::Reply(format_contacts(&contacts)))
    }
}
