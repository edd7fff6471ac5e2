//! Paginated response envelopes.
//!
//! # Invariants
//! - `page_size` equals the number of items actually returned.
//! - `total_pages` is computed from the configured page size.

use crate::model::dictionary::UserId;
use crate::repo::page::Page;
use serde::{Deserialize, Serialize};

/// One page of results plus position metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page: u32,
    /// Number of items in `content`, not the configured page size.
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        let page_size = u32::try_from(page.content.len()).unwrap_or(u32::MAX);
        Self {
            page: page.number,
            page_size,
            total_elements: page.total_elements,
            total_pages,
            content: page.content,
        }
    }
}

/// Page of dictionaries related to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDictionariesResponse<T> {
    pub user_id: UserId,
    pub page: PageResponse<T>,
}
