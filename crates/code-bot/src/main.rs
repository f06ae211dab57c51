//! Code-gate bot - main entry point.

mod commands;
mod config;
mod error;
mod render;
mod states;

use crate::commands::*;
use crate::config::Config;
use crate::error::AppResult;
use crate::render::{ImageRenderer, StockImageRenderer};
use crate::states::SessionStore;
use abuse_throttle::AbuseThrottle;
use anyhow::Context;
use contact_registry::ContactRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use telegram_client::{BotMessage, TelegramClient, UpdateReceiver};
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting code-gate bot...");

    let registry = Arc::new(ContactRegistry::open(&config.storage.database_path).await?);
    let throttle = AbuseThrottle::new();
    let sessions = SessionStore::new();
    let renderer: Arc<dyn ImageRenderer> =
        Arc::new(StockImageRenderer::new(&config.storage.images_dir));

    let client = TelegramClient::new(&config.telegram.bot_token)?;

    match client.get_me().await {
        Ok(me) => info!(
            "Authorized as @{}",
            me.username.as_deref().unwrap_or("unknown")
        ),
        Err(e) => {
            error!("Telegram API not reachable: {}", e);
            return Err(e.into());
        }
    }

    let admins = config.bot.admin_set();
    if admins.is_empty() {
        warn!("No admin ids configured - administrative commands are disabled");
    }

    // Create command handlers. Order matters: the fallback goes last, and
    // the add handler precedes it so pending contact messages reach it.
    let handlers: Vec<Box<dyn CommandHandler>> = vec![
        Box::new(LookupHandler::new(registry.clone(), throttle.clone())),
        Box::new(AddHandler::new(registry.clone(), sessions, renderer)),
        Box::new(DeleteHandler::new(registry.clone())),
        Box::new(ClearHandler::new(registry.clone())),
        Box::new(ListHandler::new(registry.clone())),
        Box::new(ImageHandler::new(registry)),
        Box::new(UnmuteHandler::new(throttle.clone())),
        Box::new(MutedListHandler::new(throttle.clone())),
        Box::new(StartHandler::new(throttle.clone())),
        Box::new(HelpHandler::new(throttle.clone())),
        Box::new(UnknownHandler::new(throttle)),
    ];

    info!("Registered {} command handlers", handlers.len());
    info!("Listening for messages...");

    // Start update receiver
    let receiver = UpdateReceiver::new(client.clone(), config.telegram.poll_timeout);
    let mut stream = Box::pin(receiver.stream());

    // Main message loop
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                handle_message(&client, &handlers, &admins, &message).await;
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

async fn handle_message(
    client: &TelegramClient,
    handlers: &[Box<dyn CommandHandler>],
    admins: &HashSet<i64>,
    message: &BotMessage,
) {
    let Some(handler) = handlers.iter().find(|h| h.matches(message)) else {
        return;
    };

    if handler.is_admin_only() && !admins.contains(&message.user_id) {
        let _ = client
            .send_message(message.chat_id, "You are not allowed to use this command.")
            .await;
        return;
    }

    match handler.execute(message).await {
        Ok(outcome) => deliver(client, message, outcome).await,
        Err(e) => {
            error!("Handler {} failed: {}", handler.name(), e);
            let _ = client
                .send_message(
                    message.chat_id,
                    "❌ Something went wrong. Please try again later.",
                )
                .await;
        }
    }
}

/// Carry out the side effect a handler asked for.
async fn deliver(client: &TelegramClient, message: &BotMessage, outcome: Outcome) {
    let result = match outcome {
        Outcome::Silent => return,
        Outcome::Reply(text) => client.send_message(message.chat_id, &text).await,
        Outcome::Photo { path, caption } => {
            client.send_photo(message.chat_id, &path, &caption).await
        }
        Outcome::Replay {
            contact_reference,
            origin_channel_id,
        } => match contact_reference.parse::<i64>() {
            Ok(message_id) => {
                client
                    .copy_message(message.chat_id, origin_channel_id, message_id)
                    .await
            }
            Err(_) => {
                warn!(
                    reference = %contact_reference,
                    "stored reference is not a message id"
                );
                client
                    .send_message(
                        message.chat_id,
                        "❌ The stored contact could not be replayed.",
                    )
                    .await
            }
        },
    };

    if let Err(e) = result {
        error!("Failed to deliver response: {}", e);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
