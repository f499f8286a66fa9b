//! Indexes for the listing order and username lookup.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_journal_entry_created_at_seq")
                    .table(JournalEntry::Table)
                    .col((JournalEntry::CreatedAt, IndexOrder::Desc))
                    .col((JournalEntry::Seq, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_app_user_username")
                    .table(AppUser::Table)
                    .col(AppUser::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_app_user_username").table(AppUser::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_journal_entry_created_at_seq").table(JournalEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalEntry { Table, CreatedAt, Seq }

#[derive(DeriveIden)]
enum AppUser { Table, Username }
