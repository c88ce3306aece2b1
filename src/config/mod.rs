//! Configuration management for FruitBot
//!
//! Loads from optional config files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub http: HttpConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Stock page to scrape
    pub stock_url: String,
    /// IANA timezone for the footer clock
    pub timezone: String,
    /// Pause after each update before re-querying the refresh schedule
    pub settle_delay_secs: u64,
    /// Chat command prefix
    pub command_prefix: String,
    /// Optional JSON file overriding the built-in price catalog
    #[serde(default)]
    pub prices_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds, shared by the scraper and the REST client
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// REST API base URL
    pub api_url: String,
    /// Gateway websocket URL
    pub gateway_url: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Bot defaults
            .set_default("bot.stock_url", "https://fruityblox.com/stock")?
            .set_default("bot.timezone", "Asia/Singapore")?
            .set_default("bot.settle_delay_secs", 15)?
            .set_default("bot.command_prefix", "!")?
            // HTTP defaults
            .set_default("http.timeout_secs", 30)?
            // Discord defaults
            .set_default("discord.api_url", "https://discord.com/api/v10")?
            .set_default(
                "discord.gateway_url",
                "wss://gateway.discord.gg/?v=10&encoding=json",
            )?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (FRUITBOT_*)
            .add_source(Environment::with_prefix("FRUITBOT").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "stock_url={} timezone={} settle={}s prefix={}",
            self.bot.stock_url, self.bot.timezone, self.bot.settle_delay_secs, self.bot.command_prefix
        )
    }

    /// Validate required environment variables
    pub fn validate_env(&self) -> Result<()> {
        let required = vec!["BOT_TOKEN", "CHANNEL_ID"];

        for var in required {
            if std::env::var(var).is_err() {
                bail!("Required environment variable {} is not set", var);
            }
        }

        // Validate channel id format
        let channel = std::env::var("CHANNEL_ID")?;
        if channel.trim().parse::<u64>().is_err() {
            bail!("CHANNEL_ID must be a numeric Discord channel id");
        }

        Ok(())
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_without_files_or_env() {
        let config = AppConfig::load().expect("defaults should load");
        assert_eq!(config.bot.stock_url, "https://fruityblox.com/stock");
        assert_eq!(config.bot.timezone, "Asia/Singapore");
        assert_eq!(config.bot.settle_delay_secs, 15);
        assert_eq!(config.bot.command_prefix, "!");
        assert!(config.bot.prices_file.is_none());
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.discord.gateway_url.starts_with("wss://"));
    }

    #[test]
    fn digest_mentions_core_settings() {
        let config = AppConfig::load().unwrap();
        let digest = config.digest();
        assert!(digest.contains("fruityblox"));
        assert!(digest.contains("settle=15s"));
    }
}
