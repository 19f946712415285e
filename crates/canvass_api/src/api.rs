//! Request handlers for the people resource.
//!
//! # Responsibility
//! - Parse and type-coerce raw path/query parameters before core sees them.
//! - Translate service results into uniform `{success, ...}` envelopes.
//! - Map typed error kinds to HTTP status codes deterministically.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes a status + envelope.
//! - Error classification is by error kind, never by message text.
//! - A malformed id is rejected before the record store is touched.

use canvass_core::{
    export_filename, NewPerson, Person, PersonId, PersonPage, PersonRepository, PersonService,
    RepoError, SearchRequest,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Transport-agnostic reply value for one handled request.
///
/// The HTTP layer mounting these handlers copies status, headers and body
/// verbatim; nothing here depends on a specific framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    /// Set only for attachment downloads (CSV export).
    pub content_disposition: Option<String>,
    pub body: String,
}

impl HttpReply {
    fn json(status: u16, payload: &impl Serialize) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status,
                content_type: JSON_CONTENT_TYPE,
                content_disposition: None,
                body,
            },
            Err(err) => {
                log::error!("event=envelope_encode module=api status=error error={err}");
                Self {
                    status: 500,
                    content_type: JSON_CONTENT_TYPE,
                    content_disposition: None,
                    body: r#"{"success":false,"error":"Internal serialization error"}"#.to_string(),
                }
            }
        }
    }

    fn json_error(status: u16, message: impl Into<String>) -> Self {
        Self::json(
            status,
            &ErrorEnvelope {
                success: false,
                error: message.into(),
            },
        )
    }

    fn csv_attachment(body: String, filename: String) -> Self {
        Self {
            status: 200,
            content_type: CSV_CONTENT_TYPE,
            content_disposition: Some(format!("attachment; filename=\"{filename}\"")),
            body,
        }
    }
}

/// Body shape for the notes-update request.
///
/// Deliberately carries only `notes`: any other field a caller submits is
/// dropped at deserialization, so immutable fields can never be overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotesBody {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Raw query parameters for the search endpoint, pre-coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListEnvelope {
    success: bool,
    data: Vec<Person>,
    count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordEnvelope {
    success: bool,
    data: Person,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchEnvelope {
    success: bool,
    #[serde(flatten)]
    page: PersonPage,
}

#[derive(Debug, Serialize)]
struct HealthEnvelope {
    status: &'static str,
}

/// Initializes rolling-file logging for the process hosting the handlers.
///
/// Thin pass-through to core so deployments wire logging through the same
/// crate that mounts the handlers. Idempotent for identical configuration;
/// reconfiguration attempts return an error string.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    canvass_core::init_logging(level, log_dir)
}

/// GET `/health` — liveness probe.
pub fn health() -> HttpReply {
    HttpReply::json(200, &HealthEnvelope { status: "ok" })
}

/// GET `/api/people` — every record, newest first.
pub fn list_people<R: PersonRepository>(service: &PersonService<R>) -> HttpReply {
    match service.list_people() {
        Ok(people) => {
            let count = people.len();
            HttpReply::json(
                200,
                &ListEnvelope {
                    success: true,
                    data: people,
                    count,
                },
            )
        }
        Err(err) => error_reply("list_people", "Failed to fetch people", &err),
    }
}

/// POST `/api/people` — create a record from an already-deserialized body.
pub fn create_person<R: PersonRepository>(
    service: &PersonService<R>,
    body: &NewPerson,
) -> HttpReply {
    match service.create_person(body) {
        Ok(person) => HttpReply::json(
            201,
            &RecordEnvelope {
                success: true,
                data: person,
            },
        ),
        Err(err) => error_reply("create_person", "Failed to create person", &err),
    }
}

/// PUT `/api/people/:id` — overwrite the notes field of one record.
///
/// `raw_id` is the unparsed path segment; a non-numeric value is rejected
/// with 400 before the service (and therefore the store) is invoked.
pub fn update_person_notes<R: PersonRepository>(
    service: &PersonService<R>,
    raw_id: &str,
    body: &UpdateNotesBody,
) -> HttpReply {
    let Ok(id) = raw_id.trim().parse::<PersonId>() else {
        return HttpReply::json_error(400, "Invalid person ID");
    };

    match service.update_notes(id, body.notes.as_deref()) {
        Ok(person) => HttpReply::json(
            200,
            &RecordEnvelope {
                success: true,
                data: person,
            },
        ),
        Err(err) => error_reply("update_person_notes", "Failed to update person", &err),
    }
}

/// GET `/api/people/search?query=&page=&limit=` — paginated filtered search.
///
/// Out-of-range numeric page/limit values are silently clamped by the
/// service; non-numeric values are a shape violation and rejected here.
pub fn search_people<R: PersonRepository>(
    service: &PersonService<R>,
    params: &SearchParams,
) -> HttpReply {
    let (Ok(page), Ok(limit)) = (
        parse_optional_i64(params.page.as_deref()),
        parse_optional_i64(params.limit.as_deref()),
    ) else {
        return HttpReply::json_error(400, "Invalid pagination parameters");
    };

    let request = SearchRequest {
        query: params.query.clone(),
        page,
        limit,
    };

    match service.search_people(&request) {
        Ok(page) => HttpReply::json(
            200,
            &SearchEnvelope {
                success: true,
                page,
            },
        ),
        Err(err) => error_reply("search_people", "Failed to search people", &err),
    }
}

/// GET `/api/people/export/csv` — full record set as a CSV attachment.
pub fn export_people_csv<R: PersonRepository>(service: &PersonService<R>) -> HttpReply {
    match service.export_csv() {
        Ok(body) => {
            HttpReply::csv_attachment(body, export_filename(Utc::now().date_naive()))
        }
        Err(err) => error_reply("export_people_csv", "Failed to export CSV", &err),
    }
}

/// Deterministic kind-to-status mapping shared by all handlers.
fn error_reply(operation: &'static str, fallback: &'static str, err: &RepoError) -> HttpReply {
    match err {
        RepoError::Validation(validation) => HttpReply::json_error(400, validation.to_string()),
        RepoError::NotFound(_) => HttpReply::json_error(404, "Person not found"),
        other => {
            log::error!("event={operation} module=api status=error error={other}");
            HttpReply::json_error(500, fallback)
        }
    }
}

fn parse_optional_i64(raw: Option<&str>) -> Result<Option<i64>, ()> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| ()),
    }
}
