//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram configuration
    pub telegram: TelegramConfig,

    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token from @BotFather
    pub bot_token: String,

    /// Long-poll timeout for getUpdates
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory holding the stock image and generated code images
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Comma-separated Telegram user ids allowed to administer the registry
    #[serde(default)]
    pub admin_ids: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            images_dir: default_images_dir(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admin_ids: String::new(),
            log_level: default_log_level(),
        }
    }
}

impl BotConfig {
    /// Parse the comma-separated admin list, skipping malformed entries.
    pub fn admin_set(&self) -> HashSet<i64> {
        self.admin_ids
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    }
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_database_path() -> String {
    "db/contacts.sqlite3".into()
}

fn default_images_dir() -> String {
    "images/user_images".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keep strings as strings: try_parsing(true) would turn
                    // numeric-looking tokens into numbers.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_set_parses_comma_separated_ids() {
        let bot = BotConfig {
            admin_ids: "5762200816, 7179744401,905319412".into(),
            log_level: "info".into(),
        };
        let admins = bot.admin_set();
        assert_eq!(admins.len(), 3);
        assert!(admins.contains(&5762200816));
        assert!(admins.contains(&905319412));
    }

    #[test]
    fn test_admin_set_skips_garbage() {
        let bot = BotConfig {
            admin_ids: "123,abc,,  456 ".into(),
            log_level: "info".into(),
        };
        let admins = bot.admin_set();
        assert_eq!(admins.len(), 2);
        assert!(admins.contains(&123));
        assert!(admins.contains(&456));
    }

    #[test]
    fn test_admin_set_empty() {
        assert!(BotConfig::default().admin_set().is_empty());
    }
}
