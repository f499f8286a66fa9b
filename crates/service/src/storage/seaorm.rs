use async_trait::async_trait;
use models::entities::{journal_entry, user};
use models::{JournalEntry, User};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use super::Storage;
use crate::errors::ServiceError;

/// PostgreSQL-backed store. Every call is a single statement; the database
/// assigns `seq` for the insertion-order tie-break.
pub struct SeaOrmStorage {
    pub db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        let found = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .order_by_asc(user::Column::Seq)
            .one(&self.db)
            .await?;
        Ok(found.map(User::from))
    }

    #[instrument(skip(self))]
    async fn create_user(&self, username: &str) -> Result<User, ServiceError> {
        let am = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(created.into())
    }

    #[instrument(skip(self, content))]
    async fn create_journal_entry(&self, content: &str) -> Result<JournalEntry, ServiceError> {
        let entry = JournalEntry::new(content);
        let am = journal_entry::ActiveModel {
            id: Set(entry.id),
            content: Set(entry.content),
            created_at: Set(entry.created_at.into()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(created.into())
    }

    async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>, ServiceError> {
        let rows = journal_entry::Entity::find()
            .order_by_desc(journal_entry::Column::CreatedAt)
            .order_by_desc(journal_entry::Column::Seq)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(JournalEntry::from).collect())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
