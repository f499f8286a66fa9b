use std::collections::HashSet;

use models::{journal, JournalEntry, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-memory collections shared by the memory and JSON file backends.
/// Both vectors are kept in insertion order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(skip)]
    ids: HashSet<Uuid>,
}

impl Snapshot {
    /// Rebuild the id index after deserializing.
    pub fn reindex(&mut self) {
        self.ids = self
            .users
            .iter()
            .map(|u| u.id)
            .chain(self.journal_entries.iter().map(|e| e.id))
            .collect();
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }

    pub fn push_entry(&mut self, content: &str) -> JournalEntry {
        let mut entry = JournalEntry::new(content);
        entry.id = self.fresh_id();
        self.ids.insert(entry.id);
        self.journal_entries.push(entry.clone());
        entry
    }

    /// Undo the most recent `push_entry`.
    pub fn pop_entry(&mut self) {
        if let Some(e) = self.journal_entries.pop() {
            self.ids.remove(&e.id);
        }
    }

    pub fn push_user(&mut self, username: &str) -> User {
        let mut user = User::new(username);
        user.id = self.fresh_id();
        self.ids.insert(user.id);
        self.users.push(user.clone());
        user
    }

    pub fn pop_user(&mut self) {
        if let Some(u) = self.users.pop() {
            self.ids.remove(&u.id);
        }
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn entries_newest_first(&self) -> Vec<JournalEntry> {
        journal::sort_newest_first(self.journal_entries.clone())
    }
}
