//! Price catalog
//!
//! Static map from lowercased fruit name to its shop price in Beli. Ships
//! with a built-in table; a JSON file can override the whole table at
//! startup. Nothing mutates the catalog after load.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Built-in shop prices, keyed by lowercased fruit name
const BUILTIN_PRICES: &[(&str, u64)] = &[
    ("rocket", 5_000),
    ("spin", 7_500),
    ("blade", 30_000),
    ("spring", 60_000),
    ("bomb", 80_000),
    ("smoke", 100_000),
    ("spike", 180_000),
    ("flame", 250_000),
    ("falcon", 300_000),
    ("ice", 350_000),
    ("sand", 420_000),
    ("dark", 500_000),
    ("diamond", 600_000),
    ("light", 650_000),
    ("rubber", 750_000),
    ("barrier", 800_000),
    ("ghost", 940_000),
    ("magma", 960_000),
    ("quake", 1_000_000),
    ("buddha", 1_200_000),
    ("love", 1_300_000),
    ("spider", 1_500_000),
    ("sound", 1_700_000),
    ("phoenix", 1_800_000),
    ("portal", 1_900_000),
    ("rumble", 2_100_000),
    ("pain", 2_300_000),
    ("blizzard", 2_400_000),
    ("gravity", 2_500_000),
    ("mammoth", 2_700_000),
    ("t-rex", 2_700_000),
    ("dough", 2_800_000),
    ("shadow", 2_900_000),
    ("venom", 3_000_000),
    ("control", 3_200_000),
    ("spirit", 3_400_000),
    ("dragon", 3_500_000),
    ("leopard", 5_000_000),
    ("kitsune", 8_000_000),
];

/// Read-only fruit price table
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    prices: HashMap<String, u64>,
}

impl PriceCatalog {
    /// Catalog with the built-in price table.
    pub fn builtin() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(name, price)| (name.to_string(), *price))
                .collect(),
        }
    }

    /// Catalog loaded from a JSON object of `name: price` pairs. Keys are
    /// lowercased on load so lookups stay case-insensitive.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read price file {}", path.display()))?;
        let parsed: HashMap<String, u64> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse price file {}", path.display()))?;

        let catalog = Self {
            prices: parsed
                .into_iter()
                .map(|(name, price)| (name.to_lowercase(), price))
                .collect(),
        };
        info!(
            "Loaded {} fruit prices from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Price for a fruit, case-insensitive.
    pub fn price(&self, name: &str) -> Option<u64> {
        self.prices.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.price(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
