//! Theme and preference persistence
//!
//! A thin key-value layer over the `kv_store` table. Values are stored as
//! JSON; each call stands alone and the last write wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::theme::{Mood, Theme};

/// Key of the last mood picked in the popup
pub const LAST_MOOD_KEY: &str = "lastMood";

/// Key of the AI-mode toggle
pub const AI_MODE_KEY: &str = "aiMode";

/// Storage key for the theme saved against a page URL
pub fn page_key(url: &str) -> String {
    format!("theme:{}", url)
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store for themes and popup preferences
#[derive(Clone)]
pub struct ThemeStore {
    pool: SqlitePool,
}

impl ThemeStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read and decode a value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a value, overwriting any previous one
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            "#,
        )
        .bind(key)
        .bind(&json)
        .execute(&self.pool)
        .await?;

        debug!(key, "Stored value");
        Ok(())
    }

    /// Delete a value; deleting a missing key is not an error
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key, "Removed value");
        Ok(())
    }

    /// Theme saved for a page
    pub async fn page_theme(&self, url: &str) -> Result<Option<Theme>, StoreError> {
        self.get(&page_key(url)).await
    }

    pub async fn save_page_theme(&self, url: &str, theme: &Theme) -> Result<(), StoreError> {
        self.set(&page_key(url), theme).await
    }

    pub async fn forget_page_theme(&self, url: &str) -> Result<(), StoreError> {
        self.remove(&page_key(url)).await
    }

    /// Last selected mood; a stored name that is no longer a mood reads as none
    pub async fn last_mood(&self) -> Result<Option<Mood>, StoreError> {
        let name: Option<String> = self.get(LAST_MOOD_KEY).await?;
        Ok(name.and_then(|n| n.parse().ok()))
    }

    pub async fn set_last_mood(&self, mood: Mood) -> Result<(), StoreError> {
        self.set(LAST_MOOD_KEY, &mood).await
    }

    pub async fn ai_mode(&self) -> Result<bool, StoreError> {
        Ok(self.get(AI_MODE_KEY).await?.unwrap_or(false))
    }

    pub async fn set_ai_mode(&self, enabled: bool) -> Result<(), StoreError> {
        self.set(AI_MODE_KEY, &enabled).await
    }
}
