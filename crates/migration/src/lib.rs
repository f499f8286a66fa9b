//! Migrator for the PostgreSQL journal store.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_journal_entry;
mod m20250101_000002_create_app_user;
mod m20250101_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_journal_entry::Migration),
            Box::new(m20250101_000002_create_app_user::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000003_add_indexes::Migration),
        ]
    }
}
