//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from seeding/reporting orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Repository writes must call the model's `validate()` before persistence.
//! - Constraint failures are classified by SQLite extended result code, never
//!   by message text.

pub mod job_repo;
pub mod person_repo;

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    DuplicateKey {
        table: &'static str,
        key: String,
    },
    ForeignKeyViolation {
        table: &'static str,
        key: String,
    },
    ConstraintViolation {
        table: &'static str,
        key: String,
        detail: String,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateKey { table, key } => {
                write!(f, "duplicate primary key `{key}` in {table}")
            }
            Self::ForeignKeyViolation { table, key } => {
                write!(f, "foreign key constraint failed for {table} `{key}`")
            }
            Self::ConstraintViolation { table, key, detail } => {
                write!(f, "constraint failed for {table} `{key}`: {detail}")
            }
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

/// Maps a failed write on `table` for the row keyed by `key`.
pub(crate) fn classify_write_error(
    err: rusqlite::Error,
    table: &'static str,
    key: &str,
) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let key = key.to_string();
            return match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    RepoError::DuplicateKey { table, key }
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepoError::ForeignKeyViolation { table, key },
                _ => RepoError::ConstraintViolation {
                    table,
                    key,
                    detail: message.clone().unwrap_or_else(|| failure.to_string()),
                },
            };
        }
    }

    err.into()
}

/// Fails when `table` has not been created by migrations.
pub(crate) fn ensure_table(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}
