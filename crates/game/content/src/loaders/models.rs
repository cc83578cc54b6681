//! Unit model loader.

use std::path::Path;

use crawl_core::{UnitCatalog, UnitModel};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Unit model catalog as stored in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitModelCatalog {
    pub models: Vec<UnitModel>,
}

/// Loader for unit models from RON files.
pub struct ModelLoader;

impl ModelLoader {
    /// Load a [`UnitCatalog`] from a RON file.
    pub fn load(path: &Path) -> LoadResult<UnitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a [`UnitCatalog`] from RON text.
    ///
    /// Model names must be unique.
    pub fn parse(content: &str) -> LoadResult<UnitCatalog> {
        let data: UnitModelCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit models RON: {}", e))?;

        let mut catalog = UnitCatalog::new();
        for model in data.models {
            let name = model.name.clone();
            if catalog.insert(model).is_some() {
                anyhow::bail!("Duplicate unit model '{}'", name);
            }
        }
        Ok(catalog)
    }
}
