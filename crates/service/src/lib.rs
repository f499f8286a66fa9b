//! Service layer for the journal: the `Storage` contract, its backends and
//! the `JournalService` that validates input before it reaches a store.
//! - Stores never validate; `JournalService` does.
//! - Every backend is constructed once and shared as `Arc<dyn Storage>`.

pub mod errors;
pub mod journal;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use journal::JournalService;
pub use storage::{build_storage, Storage};
