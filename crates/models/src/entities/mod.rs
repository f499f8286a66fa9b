//! SeaORM entities backing the PostgreSQL store.

pub mod journal_entry;
pub mod user;
