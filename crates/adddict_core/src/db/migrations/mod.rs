//! Dictionary schema migrations.
//!
//! Scripts live next to this file as `NNNN_<name>.sql` and are listed in
//! [`MIGRATIONS`] in ascending version order. A run applies every pending
//! script in one transaction and moves `PRAGMA user_version` with it.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "dictionaries",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "subscriptions",
        sql: include_str!("0002_subscriptions.sql"),
    },
];

/// Outcome of one [`apply_migrations`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Versions applied by this run, ascending. Empty when the schema was
    /// already current.
    pub applied: Vec<u32>,
}

impl MigrationReport {
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Returns the latest schema version this build can open.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the schema to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `MigrationFailed` naming the first script that failed; the schema
///   keeps its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    run_pending(conn, MIGRATIONS)
}

fn run_pending(conn: &mut Connection, migrations: &[Migration]) -> DbResult<MigrationReport> {
    let from_version = user_version(conn)?;
    let latest = migrations.last().map_or(0, |migration| migration.version);

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(MigrationReport {
            from_version,
            to_version: from_version,
            applied: Vec::new(),
        });
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        apply_one(&tx, migration).map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} name={}",
                migration.version, migration.name
            );
            DbError::MigrationFailed {
                version: migration.version,
                name: migration.name,
                source,
            }
        })?;
    }
    tx.commit()?;

    let report = MigrationReport {
        from_version,
        to_version: latest,
        applied: pending.iter().map(|migration| migration.version).collect(),
    };
    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={:?}",
        report.from_version, report.to_version, report.applied
    );
    Ok(report)
}

fn apply_one(tx: &Transaction<'_>, migration: &Migration) -> rusqlite::Result<()> {
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
