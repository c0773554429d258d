//! Connection lifecycle utilities for SQLite.
//!
//! # Responsibility
//! - Remove a stale database file before a fresh run.
//! - Open file or in-memory connections and configure required pragmas.
//! - Trigger schema migrations before returning a usable connection.
//! - Close connections explicitly so close failures are observable.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Deletes the database file at `path` if one exists.
///
/// Returns `true` when a file was removed.
pub fn reset_db_file(path: impl AsRef<Path>) -> DbResult<bool> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(
                "event=db_reset module=db status=ok removed=true path={}",
                path.display()
            );
            Ok(true)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(
                "event=db_reset module=db status=ok removed=false path={}",
                path.display()
            );
            Ok(false)
        }
        Err(err) => {
            error!(
                "event=db_reset module=db status=error path={} error={}",
                path.display(),
                err
            );
            Err(DbError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Closes a connection, reporting errors instead of swallowing them on drop.
pub fn close_db(conn: Connection) -> DbResult<()> {
    match conn.close() {
        Ok(()) => {
            info!("event=db_close module=db status=ok");
            Ok(())
        }
        Err((_conn, err)) => {
            warn!("event=db_close module=db status=error error={}", err);
            Err(err.into())
        }
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    // SQLite leaves foreign keys off unless enabled per connection.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
