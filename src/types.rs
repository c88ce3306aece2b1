//! Core types used throughout FruitBot
//!
//! Defines the stock snapshot shape and the sentinel placeholders shared
//! by the scraper and the formatter.

use serde::{Deserialize, Serialize};

/// Placeholder when the normal half of the shop is empty after a scrape.
pub const NO_NORMAL_STOCK: &str = "No fruits in normal stock";
/// Placeholder when the mirage half of the shop is empty after a scrape.
pub const NO_MIRAGE_STOCK: &str = "No fruits in mirage stock";
/// Placeholder for the normal half when the page fetch itself failed.
pub const FETCH_ERROR_NORMAL: &str = "Error fetching normal stock data";
/// Placeholder for the mirage half when the page fetch itself failed.
pub const FETCH_ERROR_MIRAGE: &str = "Error fetching mirage stock data";

/// One complete scrape of the stock page.
///
/// Produced fresh on every scrape and discarded after formatting; snapshots
/// are never merged. Both halves are always non-empty: every failure path
/// substitutes a single-element placeholder so downstream formatting never
/// sees an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Fruits in the normal shop section, in page order.
    pub normal: Vec<String>,
    /// Fruits in the mirage shop section, in page order.
    pub mirage: Vec<String>,
}

impl StockSnapshot {
    /// Degraded snapshot for a failed page fetch.
    pub fn fetch_error() -> Self {
        Self {
            normal: vec![FETCH_ERROR_NORMAL.to_string()],
            mirage: vec![FETCH_ERROR_MIRAGE.to_string()],
        }
    }

    /// Degraded snapshot for a page that yielded zero fruit names.
    pub fn empty_stock() -> Self {
        Self {
            normal: vec![NO_NORMAL_STOCK.to_string()],
            mirage: vec![NO_MIRAGE_STOCK.to_string()],
        }
    }
}

/// Display form of a scraped fruit name: first character upper-cased, the
/// rest left exactly as scraped.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
