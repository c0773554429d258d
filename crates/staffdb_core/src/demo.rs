//! End-to-end seed-and-report run.
//!
//! # Responsibility
//! - Rebuild the database file from scratch.
//! - Seed the sample people and jobs, then read both tables back.
//!
//! # Invariants
//! - The connection lives in this function's scope and is released on every
//!   exit path; the success path closes it explicitly.
//! - Rejected sample records are reported, never returned as errors.

use crate::config::DemoConfig;
use crate::db::{close_db, open_db, reset_db_file, DbError};
use crate::model::job::JobDraft;
use crate::model::person::Person;
use crate::repo::RepoError;
use crate::service::report_service::Reporter;
use crate::service::seed_service::{SeedReport, Seeder};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal failure that aborts the run.
#[derive(Debug)]
pub enum DemoError {
    Db(DbError),
    Repo(RepoError),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database setup failed: {err}"),
            Self::Repo(err) => write!(f, "reading records failed: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for DemoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for DemoError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    pub people: SeedReport,
    pub jobs: SeedReport,
    pub person_lines: Vec<String>,
    pub job_lines: Vec<String>,
}

/// Sample people; the second `Peter` collides on the primary key.
pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("Andrew", "Sumner", Some("Andy")),
        Person::new("Peter", "Seattle", None),
        Person::new("Susan", "Boston", Some("Beannie")),
        Person::new("Fat Boy", "New Orleans", Some("Slim")),
        Person::new("Peter", "Seattle", Some("Spare Pete")),
    ]
}

/// Sample jobs; one has an impossible end date, the other names a person
/// who was never inserted.
pub fn sample_jobs() -> Vec<JobDraft> {
    vec![
        JobDraft::new("Analyst", "2017-02-01", "2019-07-33", 34.999, "Andrew"),
        JobDraft::new("Developer", "2017-02-01", "2019-07-31", 34.999, "Fred"),
    ]
}

/// Runs the full sequence against the configured database file.
pub fn run_demo(config: &DemoConfig) -> Result<DemoSummary, DemoError> {
    run_with(config, &sample_people(), &sample_jobs())
}

/// Runs the full sequence with caller-provided seed data.
pub fn run_with(
    config: &DemoConfig,
    people: &[Person],
    jobs: &[JobDraft],
) -> Result<DemoSummary, DemoError> {
    reset_db_file(&config.db_path)?;
    let mut conn = open_db(&config.db_path)?;

    let people_report = Seeder::new(&mut conn).seed_people(people);
    let person_lines = Reporter::new(&conn).person_lines()?;
    for line in &person_lines {
        info!("event=report_row module=demo status=ok {line}");
    }

    let job_report = Seeder::new(&mut conn).seed_jobs(jobs);
    let job_lines = Reporter::new(&conn).job_lines()?;

    info!(
        "event=demo_done module=demo status=ok people_inserted={} people_rejected={} jobs_inserted={} jobs_rejected={}",
        people_report.inserted_count(),
        people_report.rejected_count(),
        job_report.inserted_count(),
        job_report.rejected_count()
    );

    close_db(conn)?;
    info!(
        "event=demo_db_ready module=demo status=ok path={}",
        config.db_path.display()
    );

    Ok(DemoSummary {
        people: people_report,
        jobs: job_report,
        person_lines,
        job_lines,
    })
}
