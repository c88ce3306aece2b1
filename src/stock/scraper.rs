//! Stock page scraper
//!
//! Fetches the shop page and extracts the fruit names currently in stock.
//! The page is semi-structured markup, not a stable API: fruit names ride
//! in the `alt` attribute of `<img>` tags, and the two shop sections are
//! distinguished only by position (first half normal, second half mirage).

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, warn};

use crate::types::{StockSnapshot, NO_MIRAGE_STOCK, NO_NORMAL_STOCK};

static IMG_ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*alt="([^"]+)"[^>]*>"#).unwrap());

/// Failure modes inside a scrape, before degrading to a placeholder snapshot
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("stock page request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("stock page returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("no fruits found in stock page")]
    EmptyExtraction,
}

/// Scraper for the fruit shop page
pub struct StockScraper {
    client: Client,
    url: String,
}

impl StockScraper {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch and partition the current stock.
    ///
    /// Never fails: transport errors and empty extractions both degrade to
    /// a placeholder snapshot, with the cause in the logs. Callers cannot
    /// tell the two apart except via those logs.
    pub async fn fetch(&self) -> StockSnapshot {
        match self.try_fetch().await {
            Ok(snapshot) => snapshot,
            Err(ScrapeError::EmptyExtraction) => {
                warn!("No fruits found in stock data");
                StockSnapshot::empty_stock()
            }
            Err(e) => {
                error!("Stock fetch failed: {e}");
                StockSnapshot::fetch_error()
            }
        }
    }

    async fn try_fetch(&self) -> Result<StockSnapshot, ScrapeError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let body = response.text().await?;
        let names = extract_alt_names(&body);
        if names.is_empty() {
            return Err(ScrapeError::EmptyExtraction);
        }

        Ok(partition_stock(names))
    }
}

/// Extract every `<img>` `alt` attribute, preserving document order.
///
/// Tolerant of attributes in arbitrary order within the tag and of
/// repeated tags.
pub fn extract_alt_names(html: &str) -> Vec<String> {
    IMG_ALT_RE
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Split an ordered name list at its midpoint: first half normal stock,
/// second half mirage stock.
///
/// The split is a positional policy of the page layout, not a semantic
/// classification. A half left empty by the split (one extracted name
/// total) gets its single-element placeholder.
pub fn partition_stock(names: Vec<String>) -> StockSnapshot {
    let mid = names.len() / 2;
    let mut normal = names;
    let mirage = normal.split_off(mid);

    StockSnapshot {
        normal: non_empty_or(normal, NO_NORMAL_STOCK),
        mirage: non_empty_or(mirage, NO_MIRAGE_STOCK),
    }
}

fn non_empty_or(names: Vec<String>, placeholder: &str) -> Vec<String> {
    if names.is_empty() {
        vec![placeholder.to_string()]
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_alts_in_document_order() {
        let html = r#"
            <div><img src="/a.png" alt="Dragon" class="x"></div>
            <div><img alt="Flame" src="/b.png"></div>
            <div><img class="y" src="/c.png" alt="Ice"></div>
        "#;
        assert_eq!(extract_alt_names(html), vec!["Dragon", "Flame", "Ice"]);
    }

    #[test]
    fn extraction_is_case_insensitive_on_tag() {
        let html = r#"<IMG ALT="Magma" src="/m.png">"#;
        assert_eq!(extract_alt_names(html), vec!["Magma"]);
    }

    #[test]
    fn extraction_ignores_images_without_alt() {
        let html = r#"<img src="/decoration.png"><img alt="Buddha" src="/b.png">"#;
        assert_eq!(extract_alt_names(html), vec!["Buddha"]);
    }

    #[test]
    fn partition_even_count_splits_in_half() {
        let names: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let snapshot = partition_stock(names);
        assert_eq!(snapshot.normal, vec!["A", "B"]);
        assert_eq!(snapshot.mirage, vec!["C", "D"]);
    }

    #[test]
    fn partition_odd_count_floors_the_midpoint() {
        let names: Vec<String> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let snapshot = partition_stock(names);
        assert_eq!(snapshot.normal.len(), 2);
        assert_eq!(snapshot.mirage.len(), 3);
        assert_eq!(snapshot.normal.len() + snapshot.mirage.len(), 5);
    }

    #[test]
    fn partition_single_name_fills_normal_placeholder() {
        let snapshot = partition_stock(vec!["Dragon".to_string()]);
        assert_eq!(snapshot.normal, vec![NO_NORMAL_STOCK]);
        assert_eq!(snapshot.mirage, vec!["Dragon"]);
    }

    #[test]
    fn partition_preserves_total_count() {
        for n in 2..=12 {
            let names: Vec<String> = (0..n).map(|i| format!("fruit{i}")).collect();
            let snapshot = partition_stock(names);
            assert_eq!(snapshot.normal.len(), n / 2);
            assert_eq!(snapshot.normal.len() + snapshot.mirage.len(), n);
        }
    }
}
