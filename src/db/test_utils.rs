//! In-memory database for unit tests

use sqlx::SqlitePool;

use super::Database;

/// Pool over a fresh in-memory database with the `kv_store` table migrated
pub async fn test_pool() -> SqlitePool {
    let db = Database::new(None)
        .await
        .expect("in-memory database should open");
    db.pool().clone()
}
