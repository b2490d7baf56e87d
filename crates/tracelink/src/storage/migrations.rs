//! Schema versioning.
//!
//! The version lives in the `metadata` table. Each migration is a list of
//! statements applied in one transaction together with the version bump, so
//! a crash mid-upgrade leaves the previous version intact.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, SCHEMA_STATEMENTS};

/// Schema version this build reads and writes.
pub const CURRENT_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Statements that take a database from version `n - 1` to `n`, indexed by
/// `n - 1`.
const MIGRATIONS: &[&[&str]] = &[SCHEMA_STATEMENTS];

/// Bring the database at `conn` up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] if the database was written by a
/// newer build or its version marker is unreadable, and a query error if a
/// statement fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(CREATE_METADATA_TABLE)?;

    let found = stored_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {found} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for version in (found + 1)..=CURRENT_VERSION {
        apply(conn, version)?;
        info!(version, "Applied schema migration");
    }
    Ok(())
}

fn stored_version(conn: &Connection) -> Result<u32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [SCHEMA_VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("unreadable schema version marker: {raw:?}"),
        }),
    }
}

fn apply(conn: &mut Connection, version: u32) -> Result<()> {
    let statements = version
        .checked_sub(1)
        .and_then(|i| MIGRATIONS.get(i as usize))
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("no migration to version {version}"),
        })?;

    let tx = conn.transaction()?;
    for statement in *statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (SCHEMA_VERSION_KEY, version.to_string()),
    )?;
    tx.commit()?;
    Ok(())
}
