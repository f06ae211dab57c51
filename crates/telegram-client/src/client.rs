//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::multipart;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// Create a client for the given bot token.
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        Self::with_base_url(format!("https://api.telegram.org/bot{token}"))
    }

    /// Create a client against a custom API endpoint. Used in tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, TelegramError> {
        // Timeout must leave room for the long-poll timeout of getUpdates.
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?;

        let envelope: ApiResponse<T> = response.json().await?;
        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api(
                description.unwrap_or_else(|| format!("{method} returned no result")),
            )),
        }
    }

    /// Fetch the bot's own identity, validating the token.
    pub async fn get_me(&self) -> Result<BotIdentity, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Check if the Bot API is reachable with this token.
    pub async fn health_check(&self) -> bool {
        self.get_me().await.is_ok()
    }

    /// Long-poll for updates after `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &serde_json::json!({ "offset": offset, "timeout": timeout_secs }),
            )
            .await?;

        debug!("Received {} updates", updates.len());
        Ok(updates)
    }

    /// Send a plain text message.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let _: Message = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await
            .map_err(|e| match e {
                TelegramError::Api(msg) => {
                    warn!("Send failed: {}", msg);
                    TelegramError::SendFailed(msg)
                }
                other => other,
            })?;

        debug!(chat_id, "Sent message");
        Ok(())
    }

    /// Replay a stored message to `chat_id`, without a forward header.
    #[instrument(skip(self))]
    pub async fn copy_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<(), TelegramError> {
        let _: MessageId = self
            .call(
                "copyMessage",
                &CopyMessageRequest {
                    chat_id,
                    from_chat_id,
                    message_id,
                },
            )
            .await?;

        debug!(chat_id, from_chat_id, message_id, "Copied message");
        Ok(())
    }

    /// Upload and send a photo from disk.
    #[instrument(skip(self, caption))]
    pub async fn send_photo(
        &self,
        chat_id: i64,
        path: &Path,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.png".into());

        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(format!("{}/sendPhoto", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let envelope: ApiResponse<Message> = response.json().await?;
        if !envelope.ok {
            let msg = envelope.description.unwrap_or_default();
            warn!("Photo send failed: {}", msg);
            return Err(TelegramError::SendFailed(msg));
        }

        debug!(chat_id, "Sent photo");
        Ok(())
    }
}
