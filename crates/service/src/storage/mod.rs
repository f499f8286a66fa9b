//! Storage abstractions for the journal
//!
//! `Storage` is the only sanctioned read/write path for journal entries and
//! users. Three implementations share the same contract:
//! - [`mem::MemStorage`]: process-lifetime collections behind a lock
//! - [`json_file::JsonFileStorage`]: the same collections snapshotted to a JSON file
//! - [`seaorm::SeaOrmStorage`]: PostgreSQL via SeaORM

use std::sync::Arc;

use async_trait::async_trait;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use models::{JournalEntry, User};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod json_file;
pub mod mem;
pub mod seaorm;
mod snapshot;

pub use json_file::JsonFileStorage;
pub use mem::MemStorage;
pub use seaorm::SeaOrmStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ServiceError>;
    /// First user (in creation order) with this username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ServiceError>;
    /// No uniqueness check on `username`.
    async fn create_user(&self, username: &str) -> Result<User, ServiceError>;

    /// Store `content` as given under a fresh id and the current time.
    async fn create_journal_entry(&self, content: &str) -> Result<JournalEntry, ServiceError>;
    /// Every entry, newest first; equal timestamps list the later insert first.
    async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>, ServiceError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Construct the configured backend. Called once at startup.
pub async fn build_storage(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match cfg.storage.backend {
        StorageBackend::Memory => Arc::new(MemStorage::new()),
        StorageBackend::Json => Arc::new(JsonFileStorage::open(&cfg.storage.path).await?),
        StorageBackend::Postgres => {
            let db = models::db::connect(&cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            Arc::new(SeaOrmStorage::new(db))
        }
    };
    info!(backend = storage.backend(), "storage ready");
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::StorageConfig;

    #[tokio::test]
    async fn builds_memory_backend_by_default() -> anyhow::Result<()> {
        let storage = build_storage(&AppConfig::default()).await?;
        assert_eq!(storage.backend(), "memory");
        assert!(storage.get_journal_entries().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn builds_json_backend_from_config() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("journal_build_{}", Uuid::new_v4()));
        let cfg = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Json,
                path: dir.join("journal.json").to_string_lossy().into_owned(),
            },
            ..AppConfig::default()
        };

        let storage = build_storage(&cfg).await?;
        assert_eq!(storage.backend(), "json");
        storage.create_journal_entry("kept").await?;

        let reopened = build_storage(&cfg).await?;
        assert_eq!(reopened.get_journal_entries().await?.len(), 1);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
