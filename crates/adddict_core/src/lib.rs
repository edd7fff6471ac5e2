//! Core domain logic for user-owned dictionaries.
//! This crate is the single source of truth for ownership and visibility rules.

pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use config::{ConfigError, CoreConfig};
pub use dto::dictionary::{
    CreateDictionaryRequest, DictionaryDto, GetDictionaryRequest, GetUserDictionariesRequest,
    GetUserSubscribedDictionariesRequest, SubscribeDictionaryRequest, UpdateDictionaryRequest,
};
pub use dto::page::{PageResponse, UserDictionariesResponse};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use mapper::dictionary_mapper::{DefaultDictionaryMapper, DictionaryMapper};
pub use model::dictionary::{Dictionary, DictionaryId, UserId};
pub use repo::dictionary_repo::{
    DictionaryRepository, RepoError, RepoResult, SqliteDictionaryRepository,
};
pub use repo::page::{Page, PageRequest};
pub use service::dictionary_service::{
    is_forbidden_to_read, DictionaryAction, DictionaryService, DictionaryServiceError,
    ServiceResult,
};
pub use validate::dictionary_validator::{
    DefaultDictionaryValidator, DictionaryValidationError, DictionaryValidator,
};

/// Service wired with the SQLite repository and default collaborators.
pub type SqliteDictionaryService<'conn> = DictionaryService<
    SqliteDictionaryRepository<'conn>,
    DefaultDictionaryValidator,
    DefaultDictionaryMapper,
>;

/// Builds the default service over a migrated connection.
pub fn sqlite_dictionary_service<'conn>(
    conn: &'conn mut rusqlite::Connection,
    config: &CoreConfig,
) -> RepoResult<SqliteDictionaryService<'conn>> {
    let repo = SqliteDictionaryRepository::try_new(conn)?;
    Ok(DictionaryService::new(
        repo,
        DefaultDictionaryValidator,
        DefaultDictionaryMapper,
        config.dictionaries_page_size,
    ))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
