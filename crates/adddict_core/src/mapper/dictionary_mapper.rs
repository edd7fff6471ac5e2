//! Dictionary mapper seam and default implementation.

use crate::dto::dictionary::{CreateDictionaryRequest, DictionaryDto, UpdateDictionaryRequest};
use crate::model::dictionary::Dictionary;

/// Deterministic conversions between requests, entities and DTOs.
pub trait DictionaryMapper {
    /// Builds a new, not yet persisted dictionary.
    fn to_dictionary(&self, request: &CreateDictionaryRequest) -> Dictionary;
    fn to_dto(&self, dictionary: &Dictionary) -> DictionaryDto;
    /// Applies the `Some` fields of `request` onto `persisted`.
    ///
    /// Identity and owner are never changed.
    fn merge_update(&self, persisted: Dictionary, request: &UpdateDictionaryRequest)
        -> Dictionary;
}

/// Default mapper. Trims names and treats blank descriptions as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDictionaryMapper;

impl DictionaryMapper for DefaultDictionaryMapper {
    fn to_dictionary(&self, request: &CreateDictionaryRequest) -> Dictionary {
        let mut dictionary = Dictionary::new(request.author_id, request.name.trim());
        dictionary.description = normalize_description(request.description.as_deref());
        dictionary.is_public = request.is_public;
        dictionary
    }

    fn to_dto(&self, dictionary: &Dictionary) -> DictionaryDto {
        DictionaryDto {
            id: dictionary.id,
            author_id: dictionary.author_id,
            name: dictionary.name.clone(),
            description: dictionary.description.clone(),
            is_public: dictionary.is_public,
            created_at: dictionary.created_at,
            updated_at: dictionary.updated_at,
        }
    }

    fn merge_update(
        &self,
        mut persisted: Dictionary,
        request: &UpdateDictionaryRequest,
    ) -> Dictionary {
        if let Some(name) = request.name.as_deref() {
            persisted.name = name.trim().to_string();
        }
        if let Some(description) = request.description.as_deref() {
            persisted.description = normalize_description(Some(description));
        }
        if let Some(is_public) = request.is_public {
            persisted.is_public = is_public;
        }
        persisted
    }
}

fn normalize_description(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
