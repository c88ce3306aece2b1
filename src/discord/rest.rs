//! Discord REST API Client
//!
//! Sends messages and embeds to channels. Authentication is a static bot
//! token in the Authorization header; there is no other credential flow.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use tracing::debug;

use super::types::{CreateMessage, Embed, EmbedField, EmbedFooter};
use crate::notify::{Notifier, StockUpdate};

const EMBED_COLOR_ORANGE: u32 = 0xFFA500;
const FOOTER_ICON_URL: &str = "https://media.tenor.com/Qo0KoxEZZBUAAAAC/gol-d-roger-one-piece.gif";

/// REST API client for Discord
pub struct RestClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// POST a message body to a channel.
    pub async fn create_message(&self, channel_id: u64, body: &CreateMessage) -> Result<()> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .json(body)
            .send()
            .await
            .context("Failed to send Discord message request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Discord API returned {status}: {detail}");
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for RestClient {
    async fn send_update(&self, channel_id: u64, update: &StockUpdate) -> Result<()> {
        let embed = Embed {
            title: Some(update.title.clone()),
            color: Some(EMBED_COLOR_ORANGE),
            fields: vec![
                EmbedField {
                    name: "🌟 Normal Stock".to_string(),
                    value: update.normal_stock.clone(),
                    inline: false,
                },
                EmbedField {
                    name: "✨ Mirage Stock".to_string(),
                    value: update.mirage_stock.clone(),
                    inline: false,
                },
            ],
            footer: Some(EmbedFooter {
                text: update.footer.clone(),
                icon_url: Some(FOOTER_ICON_URL.to_string()),
            }),
            timestamp: Some(Utc::now().to_rfc3339()),
        };

        self.create_message(
            channel_id,
            &CreateMessage {
                content: None,
                embeds: vec![embed],
            },
        )
        .await
    }

    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()> {
        self.create_message(
            channel_id,
            &CreateMessage {
                content: Some(text.to_string()),
                embeds: Vec::new(),
            },
        )
        .await
    }
}
