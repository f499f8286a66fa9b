//! Create `app_user` table.
//!
//! `username` is deliberately not unique; lookups take the first match by `seq`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(uuid(AppUser::Id).primary_key())
                    .col(string_len(AppUser::Username, 255).not_null())
                    .col(
                        ColumnDef::new(AppUser::Seq)
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
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppUser { Table, Id, Username, Seq }
