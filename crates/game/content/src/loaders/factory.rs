//! Content factory for building worlds from data files.

use std::path::{Path, PathBuf};

use crawl_core::{GameConfig, Item, UnitCatalog, World};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, MapLoader, ModelLoader, Scenario};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── units.ron
/// ├── items.ron
/// └── maps/
///     └── arena.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load unit models from `units.ron`.
    pub fn load_models(&self) -> LoadResult<UnitCatalog> {
        let path = self.data_dir.join("units.ron");
        ModelLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<Item>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load a scenario from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load a scenario and populate it with units and items from this directory.
    pub fn load_world(&self, map_name: &str) -> LoadResult<World> {
        let scenario = self.load_map(map_name)?;
        let catalog = self.load_models()?;
        let items = self.load_items()?;
        scenario
            .build_world(catalog, &items)
            .map_err(|e| anyhow::anyhow!("Failed to build map '{}': {}", map_name, e))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
