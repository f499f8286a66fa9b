use std::sync::Arc;

use service::{JournalService, Storage};

/// Shared handler state. The store is built once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub journal: JournalService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { journal: JournalService::new(storage) }
    }
}
