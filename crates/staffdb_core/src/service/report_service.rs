//! Read-back and rendering of stored records.
//!
//! # Invariants
//! - Rows are reported in storage order; no filtering or pagination.
//! - An absent nickname renders as `(none)`, distinct from any stored value.

use crate::model::job::Job;
use crate::model::person::Person;
use crate::repo::job_repo::{JobRepository, SqliteJobRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

const ABSENT_NICKNAME: &str = "(none)";

/// Renders one person as a report line.
pub fn render_person(person: &Person) -> String {
    format!(
        "name: {}, town: {}, nick: {}",
        person.person_name,
        person.lives_in_town,
        person.nickname.as_deref().unwrap_or(ABSENT_NICKNAME)
    )
}

/// Renders one job as a report line.
pub fn render_job(job: &Job) -> String {
    format!(
        "job: {}, from: {}, to: {}, salary: {}, employee: {}",
        job.job_name, job.start_date, job.end_date, job.salary, job.person_employed
    )
}

/// Reads stored records and renders them.
pub struct Reporter<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Reporter<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Renders every stored person.
    pub fn person_lines(&self) -> RepoResult<Vec<String>> {
        let persons = SqlitePersonRepository::try_new(self.conn)?.list_persons()?;
        info!(
            "event=report module=report status=ok record=person rows={}",
            persons.len()
        );
        Ok(persons.iter().map(render_person).collect())
    }

    /// Renders every stored job.
    pub fn job_lines(&self) -> RepoResult<Vec<String>> {
        let jobs = SqliteJobRepository::try_new(self.conn)?.list_jobs()?;
        info!(
            "event=report module=report status=ok record=job rows={}",
            jobs.len()
        );
        Ok(jobs.iter().map(render_job).collect())
    }
}
