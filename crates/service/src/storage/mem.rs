use async_trait::async_trait;
use models::{JournalEntry, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::snapshot::Snapshot;
use super::Storage;
use crate::errors::ServiceError;

/// Process-lifetime store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemStorage {
    inner: RwLock<Snapshot>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.user(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.user_by_username(username))
    }

    async fn create_user(&self, username: &str) -> Result<User, ServiceError> {
        Ok(self.inner.write().await.push_user(username))
    }

    async fn create_journal_entry(&self, content: &str) -> Result<JournalEntry, ServiceError> {
        Ok(self.inner.write().await.push_entry(content))
    }

    async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>, ServiceError> {
        Ok(self.inner.read().await.entries_newest_first())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
