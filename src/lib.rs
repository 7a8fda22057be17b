//! moodify - mood-driven page theming
//!
//! Picks a theme from a closed set of moods, injects it into a page as a
//! generated stylesheet, and remembers the choice per URL.

pub mod bridge;
pub mod css;
pub mod db;
pub mod dom;
pub mod moods;
pub mod page;
pub mod popup;
pub mod store;
pub mod theme;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::info;

use bridge::Tabs;
use db::Database;
use popup::{Popup, PopupError};
use store::ThemeStore;
use theme::ThemeRegistry;

/// Config file read when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "moodify.toml";

/// Extension configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file for saved themes and preferences; None = in-memory
    pub db_path: Option<String>,
    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_filter: "moodify=info".to_string(),
        }
    }
}

impl Config {
    /// Layer defaults, the TOML file and `MOODIFY_*` environment variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("MOODIFY_"))
            .extract()?;
        Ok(config)
    }
}

/// The extension instance: storage, theme registry and open tabs
pub struct Extension {
    config: Config,
    registry: Arc<ThemeRegistry>,
    store: Arc<ThemeStore>,
    tabs: Arc<Tabs>,
}

impl Extension {
    /// Create a new extension instance
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::new(config.db_path.as_deref()).await?;
        db.health_check().await?;
        info!(db = config.db_path.as_deref().unwrap_or(":memory:"), "Storage ready");

        let store = Arc::new(ThemeStore::new(db.pool().clone()));
        let tabs = Arc::new(Tabs::new(store.clone()));

        Ok(Self {
            config,
            registry: Arc::new(ThemeRegistry::new()),
            store,
            tabs,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn store(&self) -> Arc<ThemeStore> {
        self.store.clone()
    }

    pub fn tabs(&self) -> Arc<Tabs> {
        self.tabs.clone()
    }

    /// Open the popup against the current tab state
    pub async fn popup(&self) -> Result<Popup, PopupError> {
        Popup::open(self.registry.clone(), self.store.clone(), self.tabs.clone()).await
    }
}
