// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use kindred_config::model::StorageConfig;
use kindred_core::types::{
    ChatMessage, Event, Insight, InsightDraft, MessageBatch, NewEvent, NewRelationship,
    Relationship,
};
use kindred_core::{AdapterType, HealthStatus, KindredError, PluginAdapter, StorageAdapter};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already-open database (in-memory databases in tests).
    pub fn from_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, KindredError> {
        self.db.get().ok_or_else(|| KindredError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), KindredError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, KindredError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KindredError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), KindredError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| KindredError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), KindredError> {
        self.db()?;
        self.checkpoint().await
    }

    // --- Relationships ---

    async fn create_relationship(
        &self,
        input: &NewRelationship,
    ) -> Result<Relationship, KindredError> {
        queries::relationships::create_relationship(self.db()?, input).await
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, KindredError> {
        queries::relationships::list_relationships(self.db()?).await
    }

    async fn get_relationship(&self, id: &str) -> Result<Option<Relationship>, KindredError> {
        queries::relationships::get_relationship(self.db()?, id).await
    }

    // --- Events ---

    async fn create_event(&self, input: &NewEvent) -> Result<Event, KindredError> {
        queries::events::create_event(self.db()?, input).await
    }

    async fn list_events(
        &self,
        relationship_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, KindredError> {
        queries::events::list_events(self.db()?, relationship_id, limit).await
    }

    // --- Insights ---

    async fn create_insight(
        &self,
        relationship_id: &str,
        draft: &InsightDraft,
    ) -> Result<Insight, KindredError> {
        queries::insights::create_insight(self.db()?, relationship_id, draft).await
    }

    async fn list_insights(&self, relationship_id: &str) -> Result<Vec<Insight>, KindredError> {
        queries::insights::list_insights(self.db()?, relationship_id).await
    }

    // --- Messages ---

    async fn insert_messages(&self, batch: &MessageBatch) -> Result<usize, KindredError> {
        queries::messages::insert_messages(self.db()?, batch).await
    }

    async fn list_messages(
        &self,
        user_id: &str,
        platform: &str,
        thread_id: &str,
    ) -> Result<Vec<ChatMessage>, KindredError> {
        queries::messages::list_messages(self.db()?, user_id, platform, thread_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let storage = SqliteStorage::new(make_config("never-opened.db"));
        assert!(storage.health_check().await.is_err());
        assert!(matches!(
            storage.list_relationships().await,
            Err(KindredError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let storage = SqliteStorage::from_database(
            make_config(":memory:"),
            Database::open_in_memory().await.unwrap(),
        );
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn relationship_event_insight_flow_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("flow.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let rel = storage
            .create_relationship(&NewRelationship {
                person_name: "Ana".into(),
                kind: Some("sister".into()),
                notes: Some("lives abroad".into()),
            })
            .await
            .unwrap();
        assert_eq!(
            storage.get_relationship(&rel.id).await.unwrap(),
            Some(rel.clone())
        );

        storage
            .create_event(&NewEvent {
                relationship_id: rel.id.clone(),
                event_type: "call".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(storage.list_events(&rel.id, Some(10)).await.unwrap().len(), 1);

        let draft = InsightDraft {
            summary: Some("close".into()),
            risk_score: Some(0.1),
            ..InsightDraft::default()
        };
        let insight = storage.create_insight(&rel.id, &draft).await.unwrap();
        assert_eq!(storage.list_insights(&rel.id).await.unwrap(), vec![insight]);

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
