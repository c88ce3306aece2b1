//! Stock domain: page scraping, the shop refresh schedule, and the price catalog

mod catalog;
mod schedule;
mod scraper;

pub use catalog::PriceCatalog;
pub use schedule::{StockSchedule, REFRESH_INTERVAL_SECS};
pub use scraper::{extract_alt_names, partition_stock, StockScraper};
