use std::sync::Arc;

use models::{JournalEntry, NewJournalEntry};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::Storage;

/// Application service for journal entries.
/// Validates create requests so the store only ever sees accepted input.
#[derive(Clone)]
pub struct JournalService {
    storage: Arc<dyn Storage>,
}

impl JournalService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All entries, newest first.
    #[instrument(skip(self), fields(backend = self.storage.backend()))]
    pub async fn list(&self) -> Result<Vec<JournalEntry>, ServiceError> {
        let entries = self.storage.get_journal_entries().await?;
        debug!(count = entries.len(), "journal_entries_listed");
        Ok(entries)
    }

    /// Validate and store a new entry. Content is never logged.
    #[instrument(skip(self, input), fields(backend = self.storage.backend(), len = input.content.len()))]
    pub async fn create(&self, input: NewJournalEntry) -> Result<JournalEntry, ServiceError> {
        input.validate()?;
        let entry = self.storage.create_journal_entry(&input.content).await?;
        info!(id = %entry.id, created_at = %entry.created_at, "journal_entry_created");
        Ok(entry)
    }
}
