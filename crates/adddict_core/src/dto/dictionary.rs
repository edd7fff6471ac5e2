//! Dictionary request/response DTOs.

use crate::model::dictionary::{DictionaryId, UserId};
use serde::{Deserialize, Serialize};

/// Read-only projection of a persisted dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryDto {
    pub id: DictionaryId,
    pub author_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDictionaryRequest {
    /// Becomes the dictionary owner.
    pub author_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDictionaryRequest {
    pub id: DictionaryId,
    pub request_sender_id: UserId,
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDictionaryRequest {
    /// Authenticated caller; must own the dictionary.
    pub request_sender_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl UpdateDictionaryRequest {
    /// Returns whether the request changes no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_public.is_none()
    }
}

/// Lists dictionaries authored by `user_id` as seen by `request_sender_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserDictionariesRequest {
    pub user_id: UserId,
    pub request_sender_id: UserId,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserSubscribedDictionariesRequest {
    pub user_id: UserId,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeDictionaryRequest {
    pub dictionary_id: DictionaryId,
    pub user_id: UserId,
}
