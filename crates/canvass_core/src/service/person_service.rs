//! Person use-case service.
//!
//! # Responsibility
//! - Provide list/create/update-notes/search/export entry points.
//! - Own pagination clamping and page arithmetic.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Effective search page is always >= 1; effective limit stays in
//!   [1, `SEARCH_LIMIT_MAX`]. Out-of-range input is clamped, never rejected.
//! - `total` is counted independently of the returned page.
//! - Search and list ordering is `created_at DESC, id DESC`.

use crate::export::csv::render_csv;
use crate::model::person::{NewPerson, Person, PersonId};
use crate::repo::person_repo::{PersonPageQuery, PersonRepository, RepoResult};
use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not provide a limit.
pub const SEARCH_DEFAULT_LIMIT: i64 = 10;
/// Upper bound for caller-provided page sizes.
pub const SEARCH_LIMIT_MAX: i64 = 100;

/// Raw search parameters as received from the request boundary.
///
/// All fields are optional; missing values fall back to defaults and
/// out-of-range numbers are clamped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// One page of search results with pagination metadata.
///
/// `page` and `limit` echo the effective (clamped) values actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPage {
    pub data: Vec<Person>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// Use-case service wrapper for person record operations.
///
/// Constructed explicitly and handed to request handlers; there is no
/// process-wide instance.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record, newest first.
    pub fn list_people(&self) -> RepoResult<Vec<Person>> {
        self.repo.list_people()
    }

    /// Validates and persists a new record, returning the stored row with
    /// generated id and timestamps.
    pub fn create_person(&self, input: &NewPerson) -> RepoResult<Person> {
        self.repo.create_person(input)
    }

    /// Overwrites the notes field of an existing record.
    ///
    /// # Contract
    /// - `notes = None` clears to empty string.
    /// - Only `notes` and `updated_at` change; all other fields are ignored
    ///   regardless of what the caller submitted upstream.
    /// - Missing id yields `RepoError::NotFound`.
    pub fn update_notes(&self, id: PersonId, notes: Option<&str>) -> RepoResult<Person> {
        self.repo.update_person_notes(id, notes.unwrap_or(""))
    }

    /// Runs a paginated case-insensitive substring search.
    ///
    /// Blank or missing queries match every record. Page and limit are
    /// clamped to valid bounds and echoed back in the result.
    pub fn search_people(&self, request: &SearchRequest) -> RepoResult<PersonPage> {
        let page = request.page.unwrap_or(1).max(1);
        let limit = request
            .limit
            .unwrap_or(SEARCH_DEFAULT_LIMIT)
            .clamp(1, SEARCH_LIMIT_MAX);
        let offset = u64::try_from(page - 1)
            .unwrap_or(0)
            .saturating_mul(limit as u64);

        let term = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let total = self.repo.count_people(term.as_deref())?;
        let data = self.repo.search_people(&PersonPageQuery {
            term,
            limit: limit as u32,
            offset,
        })?;

        Ok(PersonPage {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit as u64),
        })
    }

    /// Renders the full unfiltered record set as CSV text.
    pub fn export_csv(&self) -> RepoResult<String> {
        let people = self.repo.list_people()?;
        Ok(render_csv(&people))
    }
}
