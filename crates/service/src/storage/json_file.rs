use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use models::{JournalEntry, User};
use tokio::{fs, sync::RwLock};
use tracing::{error, info};
use uuid::Uuid;

use super::snapshot::Snapshot;
use super::Storage;
use crate::errors::ServiceError;

/// JSON file-backed store.
///
/// Keeps the whole collection in memory and rewrites the file after every
/// mutation while still holding the write lock, so file order always
/// matches insertion order. A failed write rolls the insert back.
///
/// Each insert-and-persist runs on its own task; a caller that is dropped
/// mid-write cannot leave memory and file disagreeing.
#[derive(Debug)]
pub struct JsonFileStorage {
    inner: Arc<RwLock<Snapshot>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the store at `path`, creating an empty file if missing. A file
    /// that exists but cannot be parsed is an error, never silently reset.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| ServiceError::Io(e.to_string()))?;
            }
        }

        let mut snapshot = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Snapshot::default(),
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes).map_err(|e| {
                ServiceError::Serialization(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Snapshot::default();
                write_snapshot(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::Io(format!("{}: {e}", file_path.display()))),
        };
        snapshot.reindex();
        info!(
            path = %file_path.display(),
            entries = snapshot.journal_entries.len(),
            users = snapshot.users.len(),
            "json store opened"
        );

        Ok(Self { inner: Arc::new(RwLock::new(snapshot)), file_path })
    }

    async fn insert_and_persist<T, I, R>(&self, what: &'static str, insert: I, rollback: R) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        I: FnOnce(&mut Snapshot) -> T + Send + 'static,
        R: FnOnce(&mut Snapshot) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let path = self.file_path.clone();
        let task = tokio::spawn(async move {
            let mut snapshot = inner.write().await;
            let value = insert(&mut *snapshot);
            if let Err(e) = write_snapshot(&path, &snapshot).await {
                rollback(&mut *snapshot);
                error!(error = %e, path = %path.display(), "persisting {what} failed");
                return Err(e);
            }
            Ok(value)
        });
        task.await.map_err(|e| ServiceError::Io(format!("persist task failed: {e}")))?
    }
}

/// Write to a sibling temp file, then rename over the target.
async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(snapshot).map_err(|e| ServiceError::Serialization(e.to_string()))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, data).await.map_err(|e| ServiceError::Io(e.to_string()))?;
    fs::rename(&tmp, path).await.map_err(|e| ServiceError::Io(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.user(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.user_by_username(username))
    }

    async fn create_user(&self, username: &str) -> Result<User, ServiceError> {
        let username = username.to_owned();
        self.insert_and_persist("user", move |s| s.push_user(&username), Snapshot::pop_user).await
    }

    async fn create_journal_entry(&self, content: &str) -> Result<JournalEntry, ServiceError> {
        let content = content.to_owned();
        self.insert_and_persist("journal entry", move |s| s.push_entry(&content), Snapshot::pop_entry).await
    }

    async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>, ServiceError> {
        Ok(self.inner.read().await.entries_newest_first())
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract_tests;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("journal_store_{}", Uuid::new_v4())).join("journal.json")
    }

    #[tokio::test]
    async fn json_storage_honours_contract() -> Result<(), anyhow::Error> {
        contract_tests::run_all(|| async { Ok::<_, anyhow::Error>(JsonFileStorage::open(temp_path()).await?) }).await
    }

    #[tokio::test]
    async fn reopen_keeps_entries_and_order() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStorage::open(&path).await?;
        let a = store.create_journal_entry("morning walk").await?;
        let b = store.create_journal_entry("evening tea").await?;
        let u = store.create_user("luna").await?;
        let before = store.get_journal_entries().await?;
        assert_eq!(before, vec![b.clone(), a.clone()]);
        drop(store);

        let reopened = JsonFileStorage::open(&path).await?;
        assert_eq!(reopened.get_journal_entries().await?, before);
        assert_eq!(reopened.get_user_by_username("luna").await?, Some(u));

        // ids loaded from disk are never handed out again
        let c = reopened.create_journal_entry("night").await?;
        assert!(c.id != a.id && c.id != b.id);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_created_empty() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStorage::open(&path).await?;
        assert!(store.get_journal_entries().await?.is_empty());
        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await?)?;
        assert_eq!(raw["journalEntries"], serde_json::json!([]));
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_fails_to_open() -> Result<(), anyhow::Error> {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).await?;
        fs::write(&path, b"{not json").await?;
        let err = JsonFileStorage::open(&path).await.unwrap_err();
        assert!(matches!(err, ServiceError::Serialization(_)));
        // the broken file is left untouched for inspection
        assert_eq!(fs::read(&path).await?, b"{not json");
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_rolls_back_insert() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStorage::open(&path).await?;
        store.create_journal_entry("saved").await?;

        // a directory squatting on the temp name makes the next write fail
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        fs::create_dir_all(&tmp).await?;

        let err = store.create_journal_entry("lost").await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        let listed = store.get_journal_entries().await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "saved");

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn dropped_create_still_lands_in_memory_and_file_alike() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStorage::open(&path).await?;

        {
            let create = store.create_journal_entry("ghost");
            tokio::pin!(create);
            // a single poll, then the caller goes away
            let _ = tokio::time::timeout(std::time::Duration::ZERO, &mut create).await;
        }

        let mut in_memory = 0;
        for _ in 0..100 {
            in_memory = store.get_journal_entries().await?.len();
            if in_memory == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(in_memory, 1);

        let reopened = JsonFileStorage::open(&path).await?;
        let on_disk = reopened.get_journal_entries().await?;
        assert_eq!(on_disk, store.get_journal_entries().await?);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
