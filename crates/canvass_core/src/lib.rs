//! Core domain logic for the canvassing record service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::csv::{export_filename, render_csv};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    format_iso_millis, NewPerson, Person, PersonId, PersonValidationError,
};
pub use repo::person_repo::{
    PersonPageQuery, PersonRepository, RepoError, RepoResult, SqlitePersonRepository,
};
pub use service::person_service::{
    PersonPage, PersonService, SearchRequest, SEARCH_DEFAULT_LIMIT, SEARCH_LIMIT_MAX,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
