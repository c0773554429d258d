//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A file stamped with a version newer than `latest_version()` is refused.
//!   The demo run always starts from a fresh file, but `open_db` is also a
//!   library entry that reopens existing files, where the check applies.

use crate::db::{DbError, DbResult};
use crate::model::schema::{schema_script, ALL_SCHEMAS};
use log::{debug, info, warn};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    build_sql: fn() -> String,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    build_sql: initial_schema_sql,
}];

/// Tables and foreign-key indexes for every declared record shape.
fn initial_schema_sql() -> String {
    schema_script(ALL_SCHEMAS)
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Migrations not yet applied to a database at `current_version`, in order.
fn pending_migrations(current_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current_version)
}

/// Applies all pending migrations on the provided connection.
///
/// Every pending step runs in one transaction; a failing step leaves the
/// file at its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        warn!(
            "event=db_migrate module=db status=error db_version={from_version} latest_supported={latest}"
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let mut pending = pending_migrations(from_version).peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let script = (migration.build_sql)();
        tx.execute_batch(&script)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
