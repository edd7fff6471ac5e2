//! Dictionary repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, paged listing and subscription APIs over `dictionaries`.
//! - Own the exclusive read-modify-write primitive (`update_with_lock`).
//!
//! # Invariants
//! - `author_id` is never rewritten by `save` or `update_with_lock`.
//! - Pages are ordered `created_at DESC, rowid DESC`; subscribed pages are
//!   ordered by subscription time, newest first.
//! - Subscribed pages only contain dictionaries the subscriber may still read.
//! - A failed mutator leaves storage untouched.

use crate::db::DbError;
use crate::model::dictionary::{now_epoch_ms, Dictionary, DictionaryId, UserId};
use crate::repo::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DICTIONARY_COLUMNS: &str = "d.uuid AS uuid,
    d.author_id AS author_id,
    d.name AS name,
    d.description AS description,
    d.is_public AS is_public,
    d.created_at AS created_at,
    d.updated_at AS updated_at";

const AUTHOR_ORDER: &str = "ORDER BY d.created_at DESC, d.rowid DESC";
const SUBSCRIPTION_ORDER: &str = "ORDER BY s.subscribed_at DESC, s.rowid DESC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for dictionary persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(DictionaryId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "dictionary not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid dictionary data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for dictionary storage.
pub trait DictionaryRepository {
    /// Gets one dictionary by id.
    fn find_by_id(&self, id: DictionaryId) -> RepoResult<Option<Dictionary>>;

    /// Inserts or updates a dictionary and returns the persisted state.
    fn save(&self, dictionary: &Dictionary) -> RepoResult<Dictionary>;

    /// Hard-deletes one dictionary and its subscriptions.
    ///
    /// Returns `RepoError::NotFound` when no row matches.
    fn delete_by_id(&self, id: DictionaryId) -> RepoResult<()>;

    /// Pages every dictionary authored by `author_id`.
    fn find_page_by_author(
        &self,
        author_id: UserId,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>>;

    /// Pages dictionaries authored by `author_id` with the given visibility.
    fn find_page_by_author_and_public(
        &self,
        author_id: UserId,
        is_public: bool,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>>;

    /// Pages dictionaries `user_id` is subscribed to.
    fn find_subscribed_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>>;

    /// Loads, mutates and persists one dictionary under an exclusive lock.
    ///
    /// # Contract
    /// - Concurrent locked updates of the same id are serialized.
    /// - Missing ids fail with `RepoError::NotFound` converted into `E`.
    /// - An `Err` from `mutate` aborts the write and is returned unchanged.
    fn update_with_lock<F, E>(&mut self, id: DictionaryId, mutate: F) -> Result<Dictionary, E>
    where
        F: FnOnce(Dictionary) -> Result<Dictionary, E>,
        E: From<RepoError>;

    /// Records a subscription. Returns `false` when it already existed.
    fn subscribe(&self, dictionary_id: DictionaryId, user_id: UserId) -> RepoResult<bool>;

    /// Removes a subscription. Returns `false` when none existed.
    fn unsubscribe(&self, dictionary_id: DictionaryId, user_id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed dictionary repository.
pub struct SqliteDictionaryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteDictionaryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["dictionaries", "dictionary_subscriptions"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::InvalidData(format!(
                    "required table `{table}` is missing; open the database through db::open_db"
                )));
            }
        }
        Ok(Self { conn })
    }
}

impl DictionaryRepository for SqliteDictionaryRepository<'_> {
    fn find_by_id(&self, id: DictionaryId) -> RepoResult<Option<Dictionary>> {
        find_in(self.conn, id)
    }

    fn save(&self, dictionary: &Dictionary) -> RepoResult<Dictionary> {
        self.conn.execute(
            "INSERT INTO dictionaries (
                uuid,
                author_id,
                name,
                description,
                is_public,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(uuid) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                is_public = excluded.is_public,
                updated_at = excluded.updated_at;",
            params![
                dictionary.id.to_string(),
                dictionary.author_id,
                dictionary.name.as_str(),
                dictionary.description.as_deref(),
                bool_to_int(dictionary.is_public),
                dictionary.created_at,
                dictionary.updated_at,
            ],
        )?;

        find_in(self.conn, dictionary.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "saved dictionary {} missing in read-back",
                dictionary.id
            ))
        })
    }

    fn delete_by_id(&self, id: DictionaryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM dictionaries WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_page_by_author(
        &self,
        author_id: UserId,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>> {
        query_page(
            self.conn,
            "FROM dictionaries d WHERE d.author_id = ?",
            vec![Value::Integer(author_id)],
            AUTHOR_ORDER,
            page,
        )
    }

    fn find_page_by_author_and_public(
        &self,
        author_id: UserId,
        is_public: bool,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>> {
        query_page(
            self.conn,
            "FROM dictionaries d WHERE d.author_id = ? AND d.is_public = ?",
            vec![
                Value::Integer(author_id),
                Value::Integer(bool_to_int(is_public)),
            ],
            AUTHOR_ORDER,
            page,
        )
    }

    fn find_subscribed_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> RepoResult<Page<Dictionary>> {
        query_page(
            self.conn,
            "FROM dictionary_subscriptions s
             INNER JOIN dictionaries d ON d.uuid = s.dictionary_uuid
             WHERE s.user_id = ?
               AND (d.is_public = 1 OR d.author_id = ?)",
            vec![Value::Integer(user_id), Value::Integer(user_id)],
            SUBSCRIPTION_ORDER,
            page,
        )
    }

    fn update_with_lock<F, E>(&mut self, id: DictionaryId, mutate: F) -> Result<Dictionary, E>
    where
        F: FnOnce(Dictionary) -> Result<Dictionary, E>,
        E: From<RepoError>,
    {
        // IMMEDIATE takes the write lock before the read, so a competing
        // writer waits on busy_timeout instead of reading a stale snapshot.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        let current = find_in(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        let author_id = current.author_id;
        let mut updated = mutate(current)?;

        if updated.id != id || updated.author_id != author_id {
            return Err(RepoError::InvalidData(format!(
                "locked update of {id} must not change identity or owner"
            ))
            .into());
        }
        updated.touch();

        tx.execute(
            "UPDATE dictionaries
             SET
                name = ?2,
                description = ?3,
                is_public = ?4,
                updated_at = ?5
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                updated.name.as_str(),
                updated.description.as_deref(),
                bool_to_int(updated.is_public),
                updated.updated_at,
            ],
        )
        .map_err(RepoError::from)?;
        tx.commit().map_err(RepoError::from)?;

        Ok(updated)
    }

    fn subscribe(&self, dictionary_id: DictionaryId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO dictionary_subscriptions
                (user_id, dictionary_uuid, subscribed_at)
             VALUES (?1, ?2, ?3);",
            params![user_id, dictionary_id.to_string(), now_epoch_ms()],
        )?;
        Ok(changed > 0)
    }

    fn unsubscribe(&self, dictionary_id: DictionaryId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM dictionary_subscriptions
             WHERE user_id = ?1 AND dictionary_uuid = ?2;",
            params![user_id, dictionary_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn find_in(conn: &Connection, id: DictionaryId) -> RepoResult<Option<Dictionary>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DICTIONARY_COLUMNS} FROM dictionaries d WHERE d.uuid = ?1;"
    ))?;
    let found = stmt
        .query_row([id.to_string()], |row| Ok(parse_dictionary_row(row)))
        .optional()?;
    found.transpose()
}

fn query_page(
    conn: &Connection,
    from_where: &str,
    bind_values: Vec<Value>,
    order_by: &str,
    page: PageRequest,
) -> RepoResult<Page<Dictionary>> {
    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) {from_where};"),
        params_from_iter(bind_values.iter()),
        |row| row.get(0),
    )?;
    let total_elements = u64::try_from(total)
        .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))?;

    let offset = i64::try_from(page.offset())
        .map_err(|_| RepoError::InvalidData(format!("page offset {} too large", page.offset())))?;
    let mut page_binds = bind_values;
    page_binds.push(Value::Integer(i64::from(page.size)));
    page_binds.push(Value::Integer(offset));

    let mut stmt = conn.prepare(&format!(
        "SELECT {DICTIONARY_COLUMNS} {from_where} {order_by} LIMIT ? OFFSET ?;"
    ))?;
    let mut rows = stmt.query(params_from_iter(page_binds))?;
    let mut content = Vec::new();
    while let Some(row) = rows.next()? {
        content.push(parse_dictionary_row(row)?);
    }

    Ok(Page {
        content,
        number: page.page,
        size: page.size,
        total_elements,
    })
}

fn parse_dictionary_row(row: &Row<'_>) -> RepoResult<Dictionary> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in dictionaries.uuid"
        ))
    })?;

    let is_public = match row.get::<_, i64>("is_public")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_public value `{other}` in dictionaries.is_public"
            )));
        }
    };

    Ok(Dictionary {
        id,
        author_id: row.get("author_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_public,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
