//! Item catalog loader.

use std::path::Path;

use crawl_core::Item;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog as stored in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Item>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse item definitions from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<Item>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse items RON: {}", e))?;

        for item in &catalog.items {
            if !(0.0..=1.0).contains(&item.absorb) || !(0.0..=1.0).contains(&item.block) {
                anyhow::bail!("Item '{}' mitigates outside [0, 1]", item.name);
            }
        }

        Ok(catalog.items)
    }
}
