//! Bot core: the scrape-format-send pipeline and command routing

pub mod commands;
pub mod scheduler;

pub use commands::{parse_command, Command};
pub use scheduler::SchedulerLoop;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::discord::types::MessageCreate;
use crate::notify::{Notifier, UpdateFormatter};
use crate::stock::{PriceCatalog, StockSchedule, StockScraper};
use crate::types::capitalize_first;

/// Wires the stock domain to the delivery side. Shared by the scheduler
/// task and the command path; the two trigger paths are deliberately not
/// serialized against each other, so a manual refresh can overlap a
/// scheduled one and both updates get sent.
pub struct Bot {
    scraper: StockScraper,
    formatter: UpdateFormatter,
    schedule: StockSchedule,
    notifier: Arc<dyn Notifier>,
    catalog: Arc<PriceCatalog>,
    channel_id: u64,
    command_prefix: String,
}

impl Bot {
    pub fn new(
        scraper: StockScraper,
        formatter: UpdateFormatter,
        schedule: StockSchedule,
        notifier: Arc<dyn Notifier>,
        catalog: Arc<PriceCatalog>,
        channel_id: u64,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            scraper,
            formatter,
            schedule,
            notifier,
            catalog,
            channel_id,
            command_prefix: command_prefix.into(),
        }
    }

    /// One scrape-format-send cycle. Failures are logged and swallowed so
    /// neither the scheduler loop nor the command path can die here.
    pub async fn run_pipeline(&self) {
        if let Err(e) = self.send_stock_update().await {
            error!("Stock update failed: {e:#}");
        }
    }

    async fn send_stock_update(&self) -> Result<()> {
        let snapshot = self.scraper.fetch().await;
        let now = Utc::now();
        let next_refresh = self.schedule.next_timestamp_after(now.timestamp());
        let update = self.formatter.format(&snapshot, now, next_refresh);

        self.notifier
            .send_update(self.channel_id, &update)
            .await
            .context("Failed to deliver stock update")?;

        info!("Stock update sent successfully");
        Ok(())
    }

    /// Handle an incoming chat message. Bot-authored messages and anything
    /// that does not parse as a command are ignored.
    pub async fn handle_message(&self, message: &MessageCreate) {
        if message.author.bot {
            return;
        }
        let Some(command) = parse_command(&message.content, &self.command_prefix) else {
            return;
        };
        let Ok(reply_channel) = message.channel_id.parse::<u64>() else {
            warn!("Non-numeric channel id on message: {}", message.channel_id);
            return;
        };

        match command {
            Command::Price { fruit } if fruit.is_empty() => {
                self.reply(
                    reply_channel,
                    "Please specify a fruit name. Example: `!price dragon`",
                )
                .await;
            }
            Command::Price { fruit } => {
                // Unknown fruits get no reply at all
                if let Some(price) = self.catalog.price(&fruit) {
                    self.reply(
                        reply_channel,
                        &format!(
                            "The price of **{}** is **{}**.",
                            capitalize_first(&fruit),
                            price
                        ),
                    )
                    .await;
                }
            }
            Command::Stock => {
                self.run_pipeline().await;
            }
        }
    }

    async fn reply(&self, channel_id: u64, text: &str) {
        if let Err(e) = self.notifier.send_text(channel_id, text).await {
            error!("Failed to send command reply: {e:#}");
        }
    }
}
