//! Person repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Person::validate()` before SQL mutations.
//! - Reads return rows in storage order (`rowid`), with no value-based sort.
//! - Read paths reject invalid persisted rows instead of masking them.

use super::{classify_write_error, ensure_table, RepoResult};
use crate::model::person::Person;
use crate::model::schema::PERSON_SCHEMA;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    person_name,
    lives_in_town,
    nickname
FROM person";

/// Repository interface for person records.
pub trait PersonRepository {
    fn create_person(&self, person: &Person) -> RepoResult<()>;
    fn get_person(&self, person_name: &str) -> RepoResult<Option<Person>>;
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    fn count_persons(&self) -> RepoResult<i64>;
}

/// SQLite-backed person repository.
///
/// Accepts a `Transaction` as well, since it derefs to `Connection`.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, PERSON_SCHEMA.table)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        self.conn
            .execute(
                "INSERT INTO person (
                    person_name,
                    lives_in_town,
                    nickname
                ) VALUES (?1, ?2, ?3);",
                params![
                    person.person_name.as_str(),
                    person.lives_in_town.as_str(),
                    person.nickname.as_deref(),
                ],
            )
            .map_err(|err| classify_write_error(err, PERSON_SCHEMA.table, &person.person_name))?;

        Ok(())
    }

    fn get_person(&self, person_name: &str) -> RepoResult<Option<Person>> {
        let person = self
            .conn
            .query_row(
                &format!("{PERSON_SELECT_SQL} WHERE person_name = ?1;"),
                [person_name],
                |row| Ok(read_person_row(row)),
            )
            .optional()?;

        person.transpose()
    }

    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(read_person_row(row)?);
        }

        Ok(persons)
    }

    fn count_persons(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM person;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn read_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let person = Person {
        person_name: row.get("person_name")?,
        lives_in_town: row.get("lives_in_town")?,
        nickname: row.get("nickname")?,
    };
    person.validate()?;
    Ok(person)
}
