//! Create `journal_entry` table.
//!
//! `seq` is a bigserial recording insertion order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalEntry::Table)
                    .if_not_exists()
                    .col(uuid(JournalEntry::Id).primary_key())
                    .col(text(JournalEntry::Content).not_null())
                    .col(timestamp_with_time_zone(JournalEntry::CreatedAt).not_null())
                    .col(
                        ColumnDef::new(JournalEntry::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(JournalEntry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum JournalEntry { Table, Id, Content, CreatedAt, Seq }
