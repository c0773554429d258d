use chrono::NaiveDate;
use staffdb_core::db::open_db_in_memory;
use staffdb_core::{
    Job, JobDraft, JobRepository, Person, PersonRepository, RepoError, Salary,
    SqliteJobRepository, SqlitePersonRepository,
};
use rusqlite::Connection;

fn seed_person(conn: &Connection, name: &str) {
    SqlitePersonRepository::try_new(conn)
        .unwrap()
        .create_person(&Person::new(name, "Sumner", None))
        .unwrap();
}

fn job(name: &str, employee: &str) -> Job {
    JobDraft::new(name, "2017-02-01", "2019-07-31", 34.999, employee)
        .parse()
        .unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    let repo = SqliteJobRepository::try_new(&conn).unwrap();

    let analyst = job("Analyst", "Andrew");
    repo.create_job(&analyst).unwrap();

    let loaded = repo.get_job("Analyst").unwrap().unwrap();
    assert_eq!(loaded, analyst);
    assert_eq!(loaded.start_date, NaiveDate::from_ymd_opt(2017, 2, 1).unwrap());
    assert_eq!(loaded.salary.to_string(), "35.00");
    assert!(repo.get_job("Developer").unwrap().is_none());
}

#[test]
fn dates_and_salary_use_storage_forms() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    SqliteJobRepository::try_new(&conn)
        .unwrap()
        .create_job(&job("Analyst", "Andrew"))
        .unwrap();

    let (end_date, salary): (String, i64) = conn
        .query_row(
            "SELECT end_date, salary FROM job WHERE job_name = 'Analyst';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(end_date, "2019-07-31");
    assert_eq!(salary, 3500);
}

#[test]
fn missing_person_fails_foreign_key_and_leaves_no_row() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    let repo = SqliteJobRepository::try_new(&conn).unwrap();
    let before = repo.count_jobs().unwrap();

    let err = repo.create_job(&job("Developer", "Fred")).unwrap_err();

    assert!(
        matches!(&err, RepoError::ForeignKeyViolation { table: "job", key } if key == "Developer"),
        "unexpected error: {err}"
    );
    assert_eq!(repo.count_jobs().unwrap(), before);
}

#[test]
fn malformed_date_is_rejected_by_model_and_storage() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");

    let draft = JobDraft::new("Analyst", "2017-02-01", "2019-07-33", 34.999, "Andrew");
    assert!(draft.parse().is_err());

    let err = conn
        .execute(
            "INSERT INTO job (job_name, start_date, end_date, salary, person_employed)
             VALUES ('Analyst', '2017-02-01', '2019-07-33', 3500, 'Andrew');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"), "{err}");

    let err = conn
        .execute(
            "INSERT INTO job (job_name, start_date, end_date, salary, person_employed)
             VALUES ('Analyst', '2017-02-01', '2019-02-30', 3500, 'Andrew');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"), "{err}");

    let repo = SqliteJobRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_jobs().unwrap(), 0);
}

#[test]
fn storage_rejects_salary_beyond_declared_digits() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");

    let err = conn
        .execute(
            "INSERT INTO job (job_name, start_date, end_date, salary, person_employed)
             VALUES ('Analyst', '2017-02-01', '2019-07-31', 10000000, 'Andrew');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"), "{err}");
}

#[test]
fn write_errors_are_classified() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    let repo = SqliteJobRepository::try_new(&conn).unwrap();

    let mut too_long = job("Analyst", "Andrew");
    too_long.person_employed = "A".repeat(31);
    let err = repo.create_job(&too_long).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    repo.create_job(&job("Tester", "Andrew")).unwrap();
    let err = repo.create_job(&job("Tester", "Andrew")).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateKey { table: "job", .. }));

    conn.execute_batch(
        "CREATE TEMP TRIGGER no_interns BEFORE INSERT ON job
         WHEN NEW.job_name = 'Intern'
         BEGIN
             SELECT RAISE(ABORT, 'interns are not hired');
         END;",
    )
    .unwrap();
    let err = repo.create_job(&job("Intern", "Andrew")).unwrap_err();
    match err {
        RepoError::ConstraintViolation { table, key, detail } => {
            assert_eq!(table, "job");
            assert_eq!(key, "Intern");
            assert!(detail.contains("interns are not hired"), "{detail}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.count_jobs().unwrap(), 1);
}

#[test]
fn jobs_can_be_listed_per_person() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    seed_person(&conn, "Susan");
    let repo = SqliteJobRepository::try_new(&conn).unwrap();

    repo.create_job(&job("Analyst", "Andrew")).unwrap();
    repo.create_job(&job("Designer", "Susan")).unwrap();
    repo.create_job(&job("Architect", "Andrew")).unwrap();

    let names: Vec<String> = repo
        .list_jobs_for_person("Andrew")
        .unwrap()
        .into_iter()
        .map(|job| job.job_name)
        .collect();
    assert_eq!(names, vec!["Analyst", "Architect"]);
    assert_eq!(repo.list_jobs().unwrap().len(), 3);
    assert!(repo.list_jobs_for_person("Fred").unwrap().is_empty());
}

#[test]
fn salary_is_read_back_exactly() {
    let conn = open_db_in_memory().unwrap();
    seed_person(&conn, "Andrew");
    let repo = SqliteJobRepository::try_new(&conn).unwrap();

    let mut top = job("Director", "Andrew");
    top.salary = Salary::from_minor_units(9_999_999).unwrap();
    repo.create_job(&top).unwrap();

    let loaded = repo.get_job("Director").unwrap().unwrap();
    assert_eq!(loaded.salary.to_string(), "99999.99");
}
