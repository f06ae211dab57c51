//! Update receiver with long polling.

use crate::client::TelegramClient;
use crate::types::BotMessage;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Polls `getUpdates` and yields normalized bot messages.
pub struct UpdateReceiver {
    client: TelegramClient,
    poll_timeout_secs: u64,
}

impl UpdateReceiver {
    /// Create a new update receiver.
    pub fn new(client: TelegramClient, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout_secs: poll_timeout.as_secs(),
        }
    }

    /// Start receiving messages as an async stream.
    pub fn stream(self) -> impl Stream<Item = BotMessage> {
        async_stream::stream! {
            let mut offset = 0i64;
            loop {
                match self.client.get_updates(offset, self.poll_timeout_secs).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            if let Some(message) = BotMessage::from_update(&update) {
                                debug!(
                                    user_id = message.user_id,
                                    chat_id = message.chat_id,
                                    "Received message"
                                );
                                yield message;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Poll error: {}", e);
                        // Back off on error
                        sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }
    }
}
