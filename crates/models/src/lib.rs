//! Domain types for the journal service and their SeaORM entity mappings.

pub mod db;
pub mod entities;
pub mod errors;
pub mod journal;
pub mod user;

pub use journal::{JournalEntry, NewJournalEntry};
pub use user::User;
