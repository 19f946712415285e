//! Person repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over `canvassing_record` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `NewPerson::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Updates may only ever touch `notes` and `updated_at`.

use crate::db::DbError;
use crate::model::person::{is_valid_epoch_millis, NewPerson, Person, PersonId, PersonValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    notes,
    created_at,
    updated_at
FROM canvassing_record";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
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

/// Query options for one page of filtered records.
///
/// `term` is a raw user query: `None` or blank matches every record,
/// anything else is a case-insensitive substring match over name, email and
/// notes fields. Case folding follows SQLite `LIKE` semantics: ASCII letters
/// only, non-ASCII characters compare exactly.
#[derive(Debug, Clone, Default)]
pub struct PersonPageQuery {
    pub term: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

/// Repository interface for person record operations.
pub trait PersonRepository {
    fn create_person(&self, input: &NewPerson) -> RepoResult<Person>;
    fn update_person_notes(&self, id: PersonId, notes: &str) -> RepoResult<Person>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    fn search_people(&self, query: &PersonPageQuery) -> RepoResult<Vec<Person>>;
    fn count_people(&self, term: Option<&str>) -> RepoResult<u64>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, input: &NewPerson) -> RepoResult<Person> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO canvassing_record (first_name, last_name, email, notes)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.normalized_first_name(),
                input.normalized_last_name(),
                input.normalized_email(),
                input.normalized_notes(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_person(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("person {id} missing directly after insert"))
        })
    }

    fn update_person_notes(&self, id: PersonId, notes: &str) -> RepoResult<Person> {
        // Single conditional statement: the existence check and the write are
        // one round trip, so concurrent writers cannot interleave between them.
        let changed = self.conn.execute(
            "UPDATE canvassing_record
             SET
                notes = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![notes, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_person(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("person {id} missing directly after update"))
        })
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn search_people(&self, query: &PersonPageQuery) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE first_name LIKE ?1
                OR last_name LIKE ?1
                OR IFNULL(email, '') LIKE ?1
                OR notes LIKE ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2 OFFSET ?3;"
        ))?;

        let pattern = like_pattern(query.term.as_deref());
        let mut rows = stmt.query(params![
            pattern,
            i64::from(query.limit),
            i64::try_from(query.offset).unwrap_or(i64::MAX),
        ])?;

        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn count_people(&self, term: Option<&str>) -> RepoResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM canvassing_record
             WHERE first_name LIKE ?1
                OR last_name LIKE ?1
                OR IFNULL(email, '') LIKE ?1
                OR notes LIKE ?1;",
            params![like_pattern(term)],
            |row| row.get(0),
        )?;

        Ok(u64::try_from(total).unwrap_or(0))
    }
}

/// Builds the LIKE pattern shared by count and page queries.
///
/// Blank terms collapse to a match-everything pattern so one SQL shape
/// serves both the filtered and unfiltered paths.
fn like_pattern(term: Option<&str>) -> String {
    match term.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => format!("%{value}%"),
        None => "%".to_string(),
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let created_at: i64 = row.get("created_at")?;
    if !is_valid_epoch_millis(created_at) {
        return Err(RepoError::InvalidData(format!(
            "invalid created_at value `{created_at}` in canvassing_record.created_at"
        )));
    }

    let updated_at: i64 = row.get("updated_at")?;
    if !is_valid_epoch_millis(updated_at) {
        return Err(RepoError::InvalidData(format!(
            "invalid updated_at value `{updated_at}` in canvassing_record.updated_at"
        )));
    }

    Ok(Person {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        notes: row.get("notes")?,
        created_at,
        updated_at,
    })
}
