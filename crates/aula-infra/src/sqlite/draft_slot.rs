//! SQLite draft slot storage.
//!
//! Implements `DraftStorage` from `aula-core` on the `draft_slots` table.
//! Values are the opaque JSON envelopes produced by the persistence manager.

use aula_core::draft::storage::DraftStorage;
use aula_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DraftStorage`.
pub struct SqliteDraftStorage {
    pool: DatabasePool,
}

impl SqliteDraftStorage {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// All stored keys, for diagnostics.
    pub async fn keys(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT key FROM draft_slots ORDER BY key")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut keys = Vec::with_capacity(rows.len());
        for row in &rows {
            let key: String = row
                .try_get("key")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            keys.push(key);
        }

        Ok(keys)
    }
}

impl DraftStorage for SqliteDraftStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM draft_slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO draft_slots (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM draft_slots WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::draft::persistence::DraftPersistenceManager;
    use aula_types::wizard::{ContentType, WizardPatch, WizardState};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        std::mem::forget(dir);
        pool
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let storage = SqliteDraftStorage::new(test_pool().await);

        storage.set("wizard_draft_activity", r#"{"a":1}"#).await.unwrap();
        let got = storage.get("wizard_draft_activity").await.unwrap();
        assert_eq!(got.as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let storage = SqliteDraftStorage::new(test_pool().await);
        assert!(storage.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let storage = SqliteDraftStorage::new(test_pool().await);

        storage.set("k", "1").await.unwrap();
        storage.set("k", "2").await.unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(storage.keys().await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let storage = SqliteDraftStorage::new(test_pool().await);

        storage.set("k", "v").await.unwrap();
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();

        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence_manager_over_sqlite() {
        let manager = DraftPersistenceManager::new(SqliteDraftStorage::new(test_pool().await));

        let mut state = WizardState::new(ContentType::Assessment);
        state.topic = "Photosynthesis".to_string();
        manager.try_save(&state).await.unwrap();

        let loaded = manager
            .load(ContentType::Assessment, &WizardPatch::default())
            .await;
        assert_eq!(loaded.topic, "Photosynthesis");

        let other = manager
            .load(ContentType::LessonPlan, &WizardPatch::default())
            .await;
        assert!(other.topic.is_empty());
    }
}
