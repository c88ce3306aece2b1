use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use fruitbot::bot::{Bot, SchedulerLoop};
use fruitbot::config::AppConfig;
use fruitbot::discord::{GatewayClient, GatewayEvent, RestClient};
use fruitbot::notify::UpdateFormatter;
use fruitbot::stock::{PriceCatalog, StockSchedule, StockScraper};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fruitbot=info".parse()?),
        )
        .init();

    info!("Starting FruitBot");

    // Load configuration
    let config = AppConfig::load()?;
    config.validate_env()?;
    info!("Configuration loaded: {}", config.digest());

    let token = std::env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?;
    let channel_id: u64 = std::env::var("CHANNEL_ID")
        .context("CHANNEL_ID is not set")?
        .trim()
        .parse()
        .context("CHANNEL_ID must be a numeric Discord channel id")?;

    let timezone: Tz = config
        .bot
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {e}", config.bot.timezone))?;

    // Price catalog: built-in table unless a JSON override is configured
    let catalog = Arc::new(match &config.bot.prices_file {
        Some(path) => PriceCatalog::from_json_file(path)?,
        None => PriceCatalog::builtin(),
    });
    info!("Price catalog ready ({} fruits)", catalog.len());

    let timeout = Duration::from_secs(config.http.timeout_secs);
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let rest = Arc::new(RestClient::new(&config.discord.api_url, &token, timeout)?);
    let scraper = StockScraper::new(http, &config.bot.stock_url);
    let formatter = UpdateFormatter::new(catalog.clone(), timezone);
    let schedule = StockSchedule::new();

    let bot = Arc::new(Bot::new(
        scraper,
        formatter,
        schedule,
        rest,
        catalog,
        channel_id,
        &config.bot.command_prefix,
    ));

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let gateway = GatewayClient::new(&config.discord.gateway_url, &token, event_tx, shutdown_rx);
    let gateway_task = tokio::spawn(gateway.run());

    // The scheduler starts on the first READY only; reconnects re-emit
    // READY but must not spawn a second loop
    let mut scheduler_started = false;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(GatewayEvent::Ready(_)) => {
                        if !scheduler_started {
                            scheduler_started = true;
                            let scheduler = SchedulerLoop::new(
                                bot.clone(),
                                schedule,
                                Duration::from_secs(config.bot.settle_delay_secs),
                            );
                            tokio::spawn(scheduler.run());
                        }
                    }
                    Some(GatewayEvent::Message(message)) => {
                        // Commands run out of band so a slow pipeline never
                        // blocks the event stream
                        let bot = bot.clone();
                        tokio::spawn(async move {
                            bot.handle_message(&message).await;
                        });
                    }
                    Some(GatewayEvent::Connected) => {
                        debug!("Gateway session established");
                    }
                    Some(GatewayEvent::Disconnected) => {
                        warn!("Gateway disconnected");
                    }
                    None => {
                        warn!("Gateway event channel closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(()).await;
                break;
            }
        }
    }

    let _ = gateway_task.await;
    Ok(())
}
