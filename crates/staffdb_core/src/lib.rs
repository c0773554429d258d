//! Core library for the staffdb record-mapping demo.
//! Owns the record shapes, storage bootstrap, seeding and reporting.

pub mod config;
pub mod db;
pub mod demo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DemoConfig};
pub use demo::{run_demo, run_with, sample_jobs, sample_people, DemoError, DemoSummary};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::job::{Job, JobDraft, Salary};
pub use model::person::Person;
pub use model::ValidationError;
pub use repo::job_repo::{JobRepository, SqliteJobRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::report_service::{render_job, render_person, Reporter};
pub use service::seed_service::{FailureKind, InsertOutcome, SeedOutcome, SeedReport, Seeder};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
