//! Common test utilities - MoodifyTest harness for end-to-end testing

use std::path::PathBuf;

use anyhow::Result;
use moodify::dom::{sample_page, SharedDocument};
use moodify::popup::Popup;
use moodify::{Config, Extension};
use tempfile::TempDir;

/// Test harness backed by an on-disk SQLite database in a temp directory
pub struct MoodifyTest {
    pub ext: Extension,
    pub db_path: PathBuf,
    /// Temp directory for the database (cleaned up on drop)
    _temp_dir: TempDir,
}

impl MoodifyTest {
    /// Start a new extension instance with a fresh database
    pub async fn start() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("moodify.db");
        let ext = Self::boot(&db_path).await?;

        Ok(Self {
            ext,
            db_path,
            _temp_dir: temp_dir,
        })
    }

    async fn boot(db_path: &std::path::Path) -> Result<Extension> {
        let config = Config {
            db_path: Some(db_path.to_string_lossy().into_owned()),
            ..Config::default()
        };
        Extension::new(config).await
    }

    /// Simulate a browser restart: a new extension over the same database
    pub async fn restart(&mut self) -> Result<()> {
        self.ext = Self::boot(&self.db_path).await?;
        Ok(())
    }

    /// Open a sample page at `url` in a new active tab
    pub async fn open_page(&self, url: &str) -> SharedDocument {
        let document = sample_page(url).shared();
        self.ext.tabs().open(url, document.clone()).await;
        document
    }

    pub async fn popup(&self) -> Popup {
        self.ext.popup().await.expect("Failed to open popup")
    }
}
