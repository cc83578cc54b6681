//! Simulator configuration read from the process environment.
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub seed: u64,
    pub turns: u64,
    /// `None` uses the data bundled with `crawl-content`.
    pub content_dir: Option<PathBuf>,
    pub map: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            turns: 200,
            content_dir: None,
            map: "arena".to_string(),
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CRAWL_SEED` - RNG seed (default: 0)
    /// - `CRAWL_TURNS` - Turn limit (default: 200)
    /// - `CRAWL_CONTENT_DIR` - Data directory (default: bundled content)
    /// - `CRAWL_MAP` - Map name under `maps/` (default: arena)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("CRAWL_SEED") {
            config.seed = seed;
        }
        if let Some(turns) = read_env::<u64>("CRAWL_TURNS") {
            config.turns = turns.max(1);
        }
        config.content_dir = env::var("CRAWL_CONTENT_DIR").ok().map(PathBuf::from);
        if let Ok(map) = env::var("CRAWL_MAP") {
            config.map = map;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
