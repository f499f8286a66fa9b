use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user;

/// Account record. Usernames are expected to be unique but the store does
/// not enforce it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), username: username.into() }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, username: m.username }
    }
}
