//! Dictionary request validation.
//!
//! # Responsibility
//! - Define the validator seam used by `DictionaryService`.
//! - Provide the default rule set for dictionary requests.
//!
//! # Invariants
//! - User ids are strictly positive.
//! - Names are non-blank, bounded and free of control characters.
//! - Updates carry at least one field.

use crate::dto::dictionary::{
    CreateDictionaryRequest, GetUserDictionariesRequest, GetUserSubscribedDictionariesRequest,
    SubscribeDictionaryRequest, UpdateDictionaryRequest,
};
use crate::model::dictionary::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum dictionary name length in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum dictionary description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

static CONTROL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Cc}").expect("valid control char regex"));

/// Structured validation failure for dictionary requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryValidationError {
    /// A user id field is zero or negative.
    InvalidUserId { field: &'static str, value: UserId },
    /// Name is empty after trim.
    BlankName,
    NameTooLong { max: usize, actual: usize },
    NameHasControlChars,
    DescriptionTooLong { max: usize, actual: usize },
    /// Update request changes nothing.
    EmptyUpdate,
}

impl Display for DictionaryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserId { field, value } => {
                write!(f, "`{field}` must be a positive user id, got {value}")
            }
            Self::BlankName => write!(f, "dictionary name must not be blank"),
            Self::NameTooLong { max, actual } => {
                write!(f, "dictionary name has {actual} chars, max is {max}")
            }
            Self::NameHasControlChars => {
                write!(f, "dictionary name must not contain control characters")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "dictionary description has {actual} chars, max is {max}")
            }
            Self::EmptyUpdate => write!(f, "update request must change at least one field"),
        }
    }
}

impl Error for DictionaryValidationError {}

pub type ValidationResult = Result<(), DictionaryValidationError>;

/// Validator seam for every dictionary request kind.
pub trait DictionaryValidator {
    fn validate_create(&self, request: &CreateDictionaryRequest) -> ValidationResult;
    fn validate_update(&self, request: &UpdateDictionaryRequest) -> ValidationResult;
    fn validate_get_user_dictionaries(
        &self,
        request: &GetUserDictionariesRequest,
    ) -> ValidationResult;
    fn validate_get_user_subscribed_dictionaries(
        &self,
        request: &GetUserSubscribedDictionariesRequest,
    ) -> ValidationResult;
    fn validate_subscribe(&self, request: &SubscribeDictionaryRequest) -> ValidationResult;
}

/// Default rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDictionaryValidator;

impl DictionaryValidator for DefaultDictionaryValidator {
    fn validate_create(&self, request: &CreateDictionaryRequest) -> ValidationResult {
        check_user_id("author_id", request.author_id)?;
        check_name(&request.name)?;
        if let Some(description) = request.description.as_deref() {
            check_description(description)?;
        }
        Ok(())
    }

    fn validate_update(&self, request: &UpdateDictionaryRequest) -> ValidationResult {
        check_user_id("request_sender_id", request.request_sender_id)?;
        if request.is_empty() {
            return Err(DictionaryValidationError::EmptyUpdate);
        }
        if let Some(name) = request.name.as_deref() {
            check_name(name)?;
        }
        if let Some(description) = request.description.as_deref() {
            check_description(description)?;
        }
        Ok(())
    }

    fn validate_get_user_dictionaries(
        &self,
        request: &GetUserDictionariesRequest,
    ) -> ValidationResult {
        check_user_id("user_id", request.user_id)?;
        check_user_id("request_sender_id", request.request_sender_id)
    }

    fn validate_get_user_subscribed_dictionaries(
        &self,
        request: &GetUserSubscribedDictionariesRequest,
    ) -> ValidationResult {
        check_user_id("user_id", request.user_id)
    }

    fn validate_subscribe(&self, request: &SubscribeDictionaryRequest) -> ValidationResult {
        check_user_id("user_id", request.user_id)
    }
}

fn check_user_id(field: &'static str, value: UserId) -> ValidationResult {
    if value <= 0 {
        return Err(DictionaryValidationError::InvalidUserId { field, value });
    }
    Ok(())
}

fn check_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DictionaryValidationError::BlankName);
    }
    let actual = trimmed.chars().count();
    if actual > NAME_MAX_CHARS {
        return Err(DictionaryValidationError::NameTooLong {
            max: NAME_MAX_CHARS,
            actual,
        });
    }
    if CONTROL_CHAR_RE.is_match(trimmed) {
        return Err(DictionaryValidationError::NameHasControlChars);
    }
    Ok(())
}

fn check_description(description: &str) -> ValidationResult {
    let actual = description.chars().count();
    if actual > DESCRIPTION_MAX_CHARS {
        return Err(DictionaryValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}
