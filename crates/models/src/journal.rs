use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{
    de::{self, IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use uuid::Uuid;

use crate::entities::journal_entry;
use crate::errors::ModelError;

/// A user-authored note with a store-assigned id and creation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Stamp a new entry with a fresh id and the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), content: content.into(), created_at: timestamp_now() }
    }
}

impl From<journal_entry::Model> for JournalEntry {
    fn from(m: journal_entry::Model) -> Self {
        Self { id: m.id, content: m.content, created_at: m.created_at.with_timezone(&Utc) }
    }
}

/// Create request body. Any `id` or `createdAt` sent by a client is ignored.
///
/// Only an object is accepted; a positional array such as `["text"]` is not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewJournalEntry {
    pub content: String,
}

impl<'de> Deserialize<'de> for NewJournalEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BodyVisitor;

        impl<'de> Visitor<'de> for BodyVisitor {
            type Value = NewJournalEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object with a string `content` field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut content: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "content" {
                        if content.is_some() {
                            return Err(de::Error::duplicate_field("content"));
                        }
                        content = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                let content = content.ok_or_else(|| de::Error::missing_field("content"))?;
                Ok(NewJournalEntry { content })
            }
        }

        deserializer.deserialize_map(BodyVisitor)
    }
}

impl NewJournalEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }

    /// Content must contain at least one non-whitespace character. It is
    /// stored as given, not trimmed.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.content.trim().is_empty() {
            return Err(ModelError::Validation("content must not be empty".into()));
        }
        Ok(())
    }
}

/// Current UTC time truncated to milliseconds so it survives every backend unchanged.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Newest first; equal timestamps keep the later-inserted entry first.
///
/// `entries` must be in insertion order.
pub fn sort_newest_first(mut entries: Vec<JournalEntry>) -> Vec<JournalEntry> {
    entries.reverse();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(id: u128, millis: i64) -> JournalEntry {
        JournalEntry {
            id: Uuid::from_u128(id),
            content: format!("entry {id}"),
            created_at: Utc.timestamp_millis_opt(millis).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_and_iso_timestamp() {
        let entry = at(1, 1_700_000_000_123);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000001");
        assert_eq!(json["content"], "entry 1");
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20.123Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn new_entry_has_millisecond_timestamp() {
        let entry = JournalEntry::new("hello");
        assert_eq!(entry.created_at, entry.created_at.trunc_subsecs(3));
        assert!(Utc::now() - entry.created_at < Duration::seconds(5));
    }

    #[test]
    fn create_request_ignores_client_supplied_fields() {
        let req: NewJournalEntry = serde_json::from_str(
            r#"{"content":"hi","id":"abc","createdAt":"1999-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req, NewJournalEntry::new("hi"));
    }

    #[test]
    fn create_request_must_be_an_object() {
        assert!(serde_json::from_str::<NewJournalEntry>(r#"["hi"]"#).is_err());
        assert!(serde_json::from_str::<NewJournalEntry>(r#""hi""#).is_err());
        assert!(serde_json::from_str::<NewJournalEntry>("{}").is_err());
        assert!(serde_json::from_str::<NewJournalEntry>(r#"{"content":"a","content":"b"}"#).is_err());
    }

    #[test]
    fn blank_content_is_invalid() {
        assert!(NewJournalEntry::new("").validate().is_err());
        assert!(NewJournalEntry::new("  \n\t").validate().is_err());
        assert!(NewJournalEntry::new(" Today was hard ").validate().is_ok());
    }

    #[test]
    fn sorts_newest_first_with_insertion_tie_break() {
        // insertion order: 1, 2, 3, 4; 2 and 3 share a timestamp
        let sorted = sort_newest_first(vec![at(1, 100), at(2, 200), at(3, 200), at(4, 50)]);
        let ids: Vec<u128> = sorted.iter().map(|e| e.id.as_u128()).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }
}
