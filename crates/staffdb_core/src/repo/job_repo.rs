//! Job repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist jobs with dates as `YYYY-MM-DD` text and salary as minor units.
//! - Resolve the reverse relation (jobs filled by one person).
//!
//! # Invariants
//! - `person_employed` existence is enforced by the foreign key, not here.
//! - Reads return rows in storage order (`rowid`).

use super::{classify_write_error, ensure_table, RepoError, RepoResult};
use crate::model::job::{format_iso_date, parse_iso_date, Job, Salary};
use crate::model::schema::{END_DATE, JOB_SCHEMA, START_DATE};
use crate::model::ValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const JOB_SELECT_SQL: &str = "SELECT
    job_name,
    start_date,
    end_date,
    salary,
    person_employed
FROM job";

/// Repository interface for job records.
pub trait JobRepository {
    fn create_job(&self, job: &Job) -> RepoResult<()>;
    fn get_job(&self, job_name: &str) -> RepoResult<Option<Job>>;
    fn list_jobs(&self) -> RepoResult<Vec<Job>>;
    /// Lists jobs whose `person_employed` is `person_name`.
    fn list_jobs_for_person(&self, person_name: &str) -> RepoResult<Vec<Job>>;
    fn count_jobs(&self) -> RepoResult<i64>;
}

/// SQLite-backed job repository.
pub struct SqliteJobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJobRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, JOB_SCHEMA.table)?;
        Ok(Self { conn })
    }

    fn query_jobs(&self, sql: &str, person_name: Option<&str>) -> RepoResult<Vec<Job>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match person_name {
            Some(name) => stmt.query([name])?,
            None => stmt.query([])?,
        };
        let mut jobs = Vec::new();

        while let Some(row) = rows.next()? {
            jobs.push(read_job_row(row)?);
        }

        Ok(jobs)
    }
}

impl JobRepository for SqliteJobRepository<'_> {
    fn create_job(&self, job: &Job) -> RepoResult<()> {
        job.validate()?;

        self.conn
            .execute(
                "INSERT INTO job (
                    job_name,
                    start_date,
                    end_date,
                    salary,
                    person_employed
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    job.job_name.as_str(),
                    format_iso_date(job.start_date),
                    format_iso_date(job.end_date),
                    job.salary.minor_units(),
                    job.person_employed.as_str(),
                ],
            )
            .map_err(|err| classify_write_error(err, JOB_SCHEMA.table, &job.job_name))?;

        Ok(())
    }

    fn get_job(&self, job_name: &str) -> RepoResult<Option<Job>> {
        let job = self
            .conn
            .query_row(
                &format!("{JOB_SELECT_SQL} WHERE job_name = ?1;"),
                [job_name],
                |row| Ok(read_job_row(row)),
            )
            .optional()?;

        job.transpose()
    }

    fn list_jobs(&self) -> RepoResult<Vec<Job>> {
        self.query_jobs(&format!("{JOB_SELECT_SQL} ORDER BY rowid ASC;"), None)
    }

    fn list_jobs_for_person(&self, person_name: &str) -> RepoResult<Vec<Job>> {
        self.query_jobs(
            &format!("{JOB_SELECT_SQL} WHERE person_employed = ?1 ORDER BY rowid ASC;"),
            Some(person_name),
        )
    }

    fn count_jobs(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM job;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn read_job_row(row: &Row<'_>) -> RepoResult<Job> {
    let start_text: String = row.get("start_date")?;
    let end_text: String = row.get("end_date")?;
    let invalid = |err: ValidationError| RepoError::InvalidData(format!("job row: {err}"));

    let job = Job {
        job_name: row.get("job_name")?,
        start_date: parse_iso_date(START_DATE.name, &start_text).map_err(invalid)?,
        end_date: parse_iso_date(END_DATE.name, &end_text).map_err(invalid)?,
        salary: Salary::from_minor_units(row.get("salary")?).map_err(invalid)?,
        person_employed: row.get("person_employed")?,
    };
    job.validate()?;
    Ok(job)
}
