//! Dictionary domain model.
//!
//! # Responsibility
//! - Define the persisted dictionary record and its ownership helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another dictionary.
//! - `author_id` never changes after creation.
//! - Visibility is binary: `is_public` or private to the owner.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a dictionary.
pub type DictionaryId = Uuid;

/// Identifier of an application user. Users live outside this crate.
pub type UserId = i64;

/// Persisted dictionary entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    pub id: DictionaryId,
    /// Owner of the dictionary.
    pub author_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Public dictionaries are readable by every user.
    pub is_public: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every locked update.
    pub updated_at: i64,
}

impl Dictionary {
    /// Creates a private dictionary with a generated stable ID.
    pub fn new(author_id: UserId, name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), author_id, name)
    }

    /// Creates a private dictionary with a caller-provided stable ID.
    pub fn with_id(id: DictionaryId, author_id: UserId, name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            author_id,
            name: name.into(),
            description: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether `user_id` owns this dictionary.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Bumps `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_epoch_ms().max(self.created_at);
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::Dictionary;

    #[test]
    fn new_dictionary_is_private_and_owned_by_author() {
        let dictionary = Dictionary::new(7, "verbs");
        assert!(!dictionary.is_public);
        assert!(dictionary.is_owned_by(7));
        assert!(!dictionary.is_owned_by(9));
        assert_eq!(dictionary.created_at, dictionary.updated_at);
    }

    #[test]
    fn touch_never_moves_updated_at_before_creation() {
        let mut dictionary = Dictionary::new(1, "nouns");
        dictionary.created_at = i64::MAX;
        dictionary.touch();
        assert_eq!(dictionary.updated_at, i64::MAX);
    }
}
