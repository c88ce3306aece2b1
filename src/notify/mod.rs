//! Update formatting and delivery seam
//!
//! Turns a stock snapshot into the outbound notification payload and
//! defines the trait the delivery side implements.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::stock::PriceCatalog;
use crate::types::{capitalize_first, StockSnapshot};

/// Section body when no listed fruit has a catalog price
pub const NO_FRUITS_AVAILABLE: &str = "No fruits available";

/// Formatted notification payload: a title, the two rendered shop
/// sections, and a footer with the clock and countdown strings. Opaque to
/// everything but the delivery boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub title: String,
    pub normal_stock: String,
    pub mirage_stock: String,
    pub footer: String,
}

/// Delivery seam: sends payloads and plain replies to a channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a stock update to a channel.
    async fn send_update(&self, channel_id: u64, update: &StockUpdate) -> Result<()>;

    /// Deliver a plain text reply to a channel.
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()>;
}

/// Renders snapshots into update payloads. Pure: same snapshot and
/// timestamps always produce the same payload.
pub struct UpdateFormatter {
    catalog: Arc<PriceCatalog>,
    timezone: Tz,
}

impl UpdateFormatter {
    pub fn new(catalog: Arc<PriceCatalog>, timezone: Tz) -> Self {
        Self { catalog, timezone }
    }

    pub fn format(
        &self,
        snapshot: &StockSnapshot,
        now: DateTime<Utc>,
        next_refresh: i64,
    ) -> StockUpdate {
        let clock = now.with_timezone(&self.timezone).format("%-l:%M:%S %p");
        let countdown = format_countdown(next_refresh - now.timestamp());

        StockUpdate {
            title: "🍇 Devil Fruits Stock Update 🍇".to_string(),
            normal_stock: self.render_section(&snapshot.normal),
            mirage_stock: self.render_section(&snapshot.mirage),
            footer: format!("{clock} | Next update in: {countdown}"),
        }
    }

    /// One line per fruit with a catalog price; fruits without a price are
    /// dropped. An empty section renders the fixed no-fruits line.
    fn render_section(&self, names: &[String]) -> String {
        let lines: Vec<String> = names
            .iter()
            .filter_map(|name| {
                self.catalog
                    .price(name)
                    .map(|price| format!("• **{}** - 💲 {}", capitalize_first(name), price))
            })
            .collect();

        if lines.is_empty() {
            NO_FRUITS_AVAILABLE.to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Render a second count as `<hours>h <minutes>m <seconds>s`.
///
/// Hours are unbounded (no day roll-over). Negative inputs render
/// negative components.
pub fn format_countdown(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn formatter() -> UpdateFormatter {
        UpdateFormatter::new(Arc::new(PriceCatalog::builtin()), chrono_tz::Asia::Singapore)
    }

    #[test]
    fn countdown_reconstructs_exact_seconds() {
        assert_eq!(format_countdown(3661), "1h 1m 1s");
        assert_eq!(format_countdown(0), "0h 0m 0s");
        assert_eq!(format_countdown(59), "0h 0m 59s");
        assert_eq!(format_countdown(14_400), "4h 0m 0s");
    }

    #[test]
    fn priced_fruits_render_one_line_each() {
        let snapshot = StockSnapshot {
            normal: vec!["dragon".to_string(), "flame".to_string()],
            mirage: vec!["ice".to_string()],
        };
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let update = formatter().format(&snapshot, now, 1_700_003_661);

        assert_eq!(update.normal_stock.lines().count(), 2);
        assert!(update.normal_stock.contains("**Dragon**"));
        assert!(update.normal_stock.contains("3500000"));
        assert_eq!(update.mirage_stock.lines().count(), 1);
        assert!(update.footer.ends_with("Next update in: 1h 1m 1s"));
    }

    #[test]
    fn uncataloged_names_are_dropped() {
        let snapshot = StockSnapshot {
            normal: vec!["dragon".to_string(), "not a fruit".to_string()],
            mirage: vec!["also unknown".to_string()],
        };
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let update = formatter().format(&snapshot, now, 1_700_000_100);

        assert!(!update.normal_stock.contains("not a fruit"));
        assert_eq!(update.mirage_stock, NO_FRUITS_AVAILABLE);
    }

    #[test]
    fn fetch_error_placeholders_render_no_fruits() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let update = formatter().format(&StockSnapshot::fetch_error(), now, 1_700_000_100);

        assert_eq!(update.normal_stock, NO_FRUITS_AVAILABLE);
        assert_eq!(update.mirage_stock, NO_FRUITS_AVAILABLE);
    }

    #[test]
    fn formatting_is_idempotent() {
        let snapshot = StockSnapshot {
            normal: vec!["buddha".to_string()],
            mirage: vec!["leopard".to_string()],
        };
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let fmt = formatter();

        assert_eq!(
            fmt.format(&snapshot, now, 1_700_001_000),
            fmt.format(&snapshot, now, 1_700_001_000)
        );
    }

    #[test]
    fn footer_clock_uses_twelve_hour_form() {
        // 2023-11-14 22:13:20 UTC is 6:13:20 AM in Singapore (UTC+8)
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let update = formatter().format(&StockSnapshot::empty_stock(), now, 1_700_000_100);
        assert!(update.footer.starts_with("6:13:20 AM"));
    }
}
