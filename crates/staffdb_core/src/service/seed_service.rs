//! Per-record transactional seeding.
//!
//! # Responsibility
//! - Insert each seed record inside its own transaction.
//! - Turn every insert into an explicit `InsertOutcome` for the caller.
//!
//! # Invariants
//! - A rejected record rolls back only its own transaction.
//! - One bad record never stops the remaining records from being attempted.
//! - Outcomes are reported in input order.

use crate::model::job::JobDraft;
use crate::model::person::Person;
use crate::repo::job_repo::{JobRepository, SqliteJobRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::{Connection, Transaction};

/// Classification of a rejected insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DuplicateKey,
    ForeignKeyViolation,
    Validation,
    Storage,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateKey => "duplicate_key",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::Validation => "validation",
            Self::Storage => "storage",
        }
    }
}

impl From<&RepoError> for FailureKind {
    fn from(value: &RepoError) -> Self {
        match value {
            RepoError::DuplicateKey { .. } => Self::DuplicateKey,
            RepoError::ForeignKeyViolation { .. } => Self::ForeignKeyViolation,
            RepoError::Validation(_) | RepoError::ConstraintViolation { .. } => Self::Validation,
            RepoError::MissingRequiredTable(_) | RepoError::InvalidData(_) | RepoError::Db(_) => {
                Self::Storage
            }
        }
    }
}

/// Result of one attempted insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Rejected { kind: FailureKind, message: String },
}

impl InsertOutcome {
    fn from_result(result: RepoResult<()>) -> Self {
        match result {
            Ok(()) => Self::Inserted,
            Err(err) => Self::Rejected {
                kind: FailureKind::from(&err),
                message: err.to_string(),
            },
        }
    }
}

/// Outcome of one seed record, keyed by its primary key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    pub key: String,
    pub outcome: InsertOutcome,
}

/// All outcomes of one seeding batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub outcomes: Vec<SeedOutcome>,
}

impl SeedReport {
    pub fn inserted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|item| item.outcome == InsertOutcome::Inserted)
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.inserted_count()
    }

    /// Keys of rejected records with their failure classification.
    pub fn rejected_keys(&self) -> Vec<(&str, FailureKind)> {
        self.outcomes
            .iter()
            .filter_map(|item| match &item.outcome {
                InsertOutcome::Rejected { kind, .. } => Some((item.key.as_str(), *kind)),
                InsertOutcome::Inserted => None,
            })
            .collect()
    }
}

/// Seeds records one transaction at a time.
pub struct Seeder<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> Seeder<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Inserts each person in its own transaction.
    pub fn seed_people(&mut self, people: &[Person]) -> SeedReport {
        let mut report = SeedReport::default();
        for person in people {
            let result = self.in_transaction("person", &person.person_name, |tx| {
                SqlitePersonRepository::try_new(tx)?.create_person(person)
            });
            report.outcomes.push(record_outcome("person", &person.person_name, result));
        }
        report
    }

    /// Parses and inserts each job draft in its own transaction.
    pub fn seed_jobs(&mut self, jobs: &[JobDraft]) -> SeedReport {
        let mut report = SeedReport::default();
        for draft in jobs {
            let result = self.in_transaction("job", &draft.job_name, |tx| {
                let job = draft.parse()?;
                SqliteJobRepository::try_new(tx)?.create_job(&job)
            });
            report.outcomes.push(record_outcome("job", &draft.job_name, result));
        }
        report
    }

    /// Runs `op` in a fresh transaction, committing on `Ok` and rolling back on `Err`.
    ///
    /// The error from `op` is returned even when the rollback itself fails.
    fn in_transaction<F>(&mut self, record: &'static str, key: &str, op: F) -> RepoResult<()>
    where
        F: FnOnce(&Transaction<'_>) -> RepoResult<()>,
    {
        let tx = self.conn.transaction()?;
        match op(&tx) {
            Ok(()) => {
                tx.commit()?;
                Ok(())
            }
            Err(err) => {
                match tx.rollback() {
                    Ok(()) => info!(
                        "event=seed_rollback module=seed status=ok record={record} key={key}"
                    ),
                    Err(rollback_err) => warn!(
                        "event=seed_rollback module=seed status=error record={record} key={key} error={rollback_err}"
                    ),
                }
                Err(err)
            }
        }
    }
}

fn record_outcome(record: &'static str, key: &str, result: RepoResult<()>) -> SeedOutcome {
    let outcome = InsertOutcome::from_result(result);
    match &outcome {
        InsertOutcome::Inserted => {
            info!("event=seed_insert module=seed status=ok record={record} key={key}");
        }
        InsertOutcome::Rejected { kind, message } => {
            error!(
                "event=seed_insert module=seed status=error record={record} key={key} error_code={} error={message}",
                kind.as_str()
            );
        }
    }
    SeedOutcome {
        key: key.to_string(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureKind, InsertOutcome, SeedOutcome, SeedReport, Seeder};
    use crate::db::open_db_in_memory;
    use crate::repo::RepoError;

    #[test]
    fn report_counts_and_rejected_keys() {
        let report = SeedReport {
            outcomes: vec![
                SeedOutcome {
                    key: "a".to_string(),
                    outcome: InsertOutcome::Inserted,
                },
                SeedOutcome {
                    key: "b".to_string(),
                    outcome: InsertOutcome::Rejected {
                        kind: FailureKind::DuplicateKey,
                        message: "dup".to_string(),
                    },
                },
            ],
        };

        assert_eq!(report.inserted_count(), 1);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.rejected_keys(), vec![("b", FailureKind::DuplicateKey)]);
    }

    #[test]
    fn failed_rollback_keeps_the_original_error() {
        let mut conn = open_db_in_memory().unwrap();
        let mut seeder = Seeder::new(&mut conn);

        // Ending the transaction early makes the following rollback fail.
        let result = seeder.in_transaction("job", "Developer", |tx| {
            tx.execute_batch("COMMIT;")?;
            Err(RepoError::ForeignKeyViolation {
                table: "job",
                key: "Developer".to_string(),
            })
        });

        assert!(matches!(
            result,
            Err(RepoError::ForeignKeyViolation { table: "job", .. })
        ));
        assert!(conn.is_autocommit());
    }
}
