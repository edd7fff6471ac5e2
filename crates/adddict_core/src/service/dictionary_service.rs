//! Dictionary use-case service.
//!
//! # Responsibility
//! - Orchestrate validation, persistence and DTO mapping for dictionaries.
//! - Enforce ownership and visibility rules above the repository layer.
//!
//! # Invariants
//! - Requests are validated before any repository call.
//! - Private dictionaries are readable only by their owner.
//! - Only the owner may update or delete a dictionary; a denied call
//!   persists nothing.
//! - Updates go through `DictionaryRepository::update_with_lock`.
//! - Response `page_size` equals the number of returned items.

use crate::dto::dictionary::{
    CreateDictionaryRequest, DictionaryDto, GetDictionaryRequest, GetUserDictionariesRequest,
    GetUserSubscribedDictionariesRequest, SubscribeDictionaryRequest, UpdateDictionaryRequest,
};
use crate::dto::page::{PageResponse, UserDictionariesResponse};
use crate::mapper::dictionary_mapper::DictionaryMapper;
use crate::model::dictionary::{Dictionary, DictionaryId, UserId};
use crate::repo::dictionary_repo::{DictionaryRepository, RepoError};
use crate::repo::page::{Page, PageRequest};
use crate::validate::dictionary_validator::{DictionaryValidationError, DictionaryValidator};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

/// Action denied by an ownership or visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryAction {
    Read,
    Update,
    Delete,
    Subscribe,
}

impl DictionaryAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Subscribe => "subscribe to",
        }
    }
}

/// Service error for dictionary use-cases.
#[derive(Debug)]
pub enum DictionaryServiceError {
    /// Request failed validation; nothing was read or written.
    Validation(DictionaryValidationError),
    /// Target dictionary does not exist.
    DictionaryNotFound(DictionaryId),
    /// Caller is not allowed to perform `action` on the dictionary.
    Forbidden {
        dictionary_id: DictionaryId,
        action: DictionaryAction,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for DictionaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid request: {err}"),
            Self::DictionaryNotFound(id) => write!(f, "dictionary not found: {id}"),
            Self::Forbidden {
                dictionary_id,
                action,
            } => write!(
                f,
                "not allowed to {} dictionary {dictionary_id}: it is private or belongs to another user",
                action.as_str()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DictionaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DictionaryNotFound(_) | Self::Forbidden { .. } => None,
        }
    }
}

impl From<RepoError> for DictionaryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::DictionaryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DictionaryValidationError> for DictionaryServiceError {
    fn from(value: DictionaryValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, DictionaryServiceError>;

/// Stateless dictionary service over injected collaborators.
pub struct DictionaryService<R, V, M>
where
    R: DictionaryRepository,
    V: DictionaryValidator,
    M: DictionaryMapper,
{
    repo: R,
    validator: V,
    mapper: M,
    page_size: NonZeroU32,
}

impl<R, V, M> DictionaryService<R, V, M>
where
    R: DictionaryRepository,
    V: DictionaryValidator,
    M: DictionaryMapper,
{
    /// Creates a service; `page_size` is the configured size of every
    /// paged listing.
    pub fn new(repo: R, validator: V, mapper: M, page_size: NonZeroU32) -> Self {
        Self {
            repo,
            validator,
            mapper,
            page_size,
        }
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Creates one dictionary owned by `request.author_id`.
    pub fn create(&self, request: &CreateDictionaryRequest) -> ServiceResult<DictionaryDto> {
        self.validator.validate_create(request)?;

        let dictionary = self.mapper.to_dictionary(request);
        let saved = self.repo.save(&dictionary)?;
        debug!(
            "event=dictionary_create module=service status=ok dictionary_id={} author_id={}",
            saved.id, saved.author_id
        );
        Ok(self.mapper.to_dto(&saved))
    }

    /// Gets one dictionary if the requester may read it.
    pub fn get(&self, request: &GetDictionaryRequest) -> ServiceResult<DictionaryDto> {
        let dictionary = self.find_existing(request.id)?;

        if is_forbidden_to_read(&dictionary, request.request_sender_id) {
            return Err(self.deny(&dictionary, request.request_sender_id, DictionaryAction::Read));
        }

        Ok(self.mapper.to_dto(&dictionary))
    }

    /// Applies a partial update under the repository's exclusive lock.
    ///
    /// # Contract
    /// - Validation runs before any storage access.
    /// - Only `request.request_sender_id` equal to the owner may update.
    /// - Missing ids fail with `DictionaryNotFound`; denied or missing
    ///   updates write nothing.
    pub fn update(
        &mut self,
        id: DictionaryId,
        request: &UpdateDictionaryRequest,
    ) -> ServiceResult<DictionaryDto> {
        self.validator.validate_update(request)?;

        let mapper = &self.mapper;
        let sender = request.request_sender_id;
        let updated = self.repo.update_with_lock(id, |persisted| {
            if !persisted.is_owned_by(sender) {
                return Err(DictionaryServiceError::Forbidden {
                    dictionary_id: persisted.id,
                    action: DictionaryAction::Update,
                });
            }
            Ok(mapper.merge_update(persisted, request))
        });

        match updated {
            Ok(dictionary) => {
                debug!(
                    "event=dictionary_update module=service status=ok dictionary_id={}",
                    dictionary.id
                );
                Ok(self.mapper.to_dto(&dictionary))
            }
            Err(err @ DictionaryServiceError::Forbidden { .. }) => {
                warn!(
                    "event=dictionary_denied module=service status=error action=update dictionary_id={} user_id={}",
                    id, sender
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Hard-deletes one dictionary owned by `user_id`.
    pub fn delete(&self, id: DictionaryId, user_id: UserId) -> ServiceResult<bool> {
        let dictionary = self.find_existing(id)?;

        if !dictionary.is_owned_by(user_id) {
            return Err(self.deny(&dictionary, user_id, DictionaryAction::Delete));
        }

        self.repo.delete_by_id(id)?;
        debug!(
            "event=dictionary_delete module=service status=ok dictionary_id={}",
            id
        );
        Ok(true)
    }

    /// Lists dictionaries authored by `request.user_id`.
    ///
    /// The owner sees every dictionary; any other requester sees only the
    /// public ones.
    pub fn list_owned_or_public(
        &self,
        request: &GetUserDictionariesRequest,
    ) -> ServiceResult<UserDictionariesResponse<DictionaryDto>> {
        self.validator.validate_get_user_dictionaries(request)?;

        let page_request = PageRequest::of(request.page, self.page_size.get());
        let page = if request.user_id == request.request_sender_id {
            self.repo.find_page_by_author(request.user_id, page_request)?
        } else {
            self.repo
                .find_page_by_author_and_public(request.user_id, true, page_request)?
        };

        Ok(self.to_response(request.user_id, page))
    }

    /// Lists dictionaries `request.user_id` is subscribed to.
    pub fn list_subscribed(
        &self,
        request: &GetUserSubscribedDictionariesRequest,
    ) -> ServiceResult<UserDictionariesResponse<DictionaryDto>> {
        self.validator
            .validate_get_user_subscribed_dictionaries(request)?;

        let page = self.repo.find_subscribed_page(
            request.user_id,
            PageRequest::of(request.page, self.page_size.get()),
        )?;

        Ok(self.to_response(request.user_id, page))
    }

    /// Subscribes a user to a dictionary they may read.
    ///
    /// Returns `false` when the subscription already existed.
    pub fn subscribe(&self, request: &SubscribeDictionaryRequest) -> ServiceResult<bool> {
        self.validator.validate_subscribe(request)?;

        let dictionary = self.find_existing(request.dictionary_id)?;
        if is_forbidden_to_read(&dictionary, request.user_id) {
            return Err(self.deny(&dictionary, request.user_id, DictionaryAction::Subscribe));
        }

        Ok(self.repo.subscribe(dictionary.id, request.user_id)?)
    }

    /// Removes a subscription. Returns `false` when none existed.
    pub fn unsubscribe(&self, request: &SubscribeDictionaryRequest) -> ServiceResult<bool> {
        self.validator.validate_subscribe(request)?;
        Ok(self
            .repo
            .unsubscribe(request.dictionary_id, request.user_id)?)
    }

    fn find_existing(&self, id: DictionaryId) -> ServiceResult<Dictionary> {
        self.repo
            .find_by_id(id)?
            .ok_or(DictionaryServiceError::DictionaryNotFound(id))
    }

    fn deny(
        &self,
        dictionary: &Dictionary,
        user_id: UserId,
        action: DictionaryAction,
    ) -> DictionaryServiceError {
        warn!(
            "event=dictionary_denied module=service status=error action={} dictionary_id={} user_id={}",
            action.as_str(),
            dictionary.id,
            user_id
        );
        DictionaryServiceError::Forbidden {
            dictionary_id: dictionary.id,
            action,
        }
    }

    fn to_response(
        &self,
        user_id: UserId,
        page: Page<Dictionary>,
    ) -> UserDictionariesResponse<DictionaryDto> {
        let page = page.map(|dictionary| self.mapper.to_dto(&dictionary));
        UserDictionariesResponse {
            user_id,
            page: PageResponse::from(page),
        }
    }
}

/// Returns whether `requester_id` must not read `dictionary`.
pub fn is_forbidden_to_read(dictionary: &Dictionary, requester_id: UserId) -> bool {
    !dictionary.is_public && !dictionary.is_owned_by(requester_id)
}

#[cfg(test)]
mod tests {
    use super::{is_forbidden_to_read, DictionaryServiceError};
    use crate::model::dictionary::Dictionary;
    use crate::repo::dictionary_repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn public_dictionaries_are_readable_by_anyone() {
        let mut dictionary = Dictionary::new(7, "verbs");
        dictionary.is_public = true;
        assert!(!is_forbidden_to_read(&dictionary, 7));
        assert!(!is_forbidden_to_read(&dictionary, 9));
    }

    #[test]
    fn private_dictionaries_are_readable_only_by_owner() {
        let dictionary = Dictionary::new(7, "verbs");
        assert!(!is_forbidden_to_read(&dictionary, 7));
        assert!(is_forbidden_to_read(&dictionary, 9));
    }

    #[test]
    fn repo_not_found_maps_to_dictionary_not_found() {
        let id = Uuid::new_v4();
        let err = DictionaryServiceError::from(RepoError::NotFound(id));
        assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(found) if found == id));

        let other = DictionaryServiceError::from(RepoError::InvalidData("x".to_string()));
        assert!(matches!(other, DictionaryServiceError::Repo(_)));
    }
}
